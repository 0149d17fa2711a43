//! Enumeration coordinator: dynamic scatter-gather over the keyspace.
//!
//! The coordinator seeds one fetch per first-level prefix, then reacts to
//! each completed page: yield its entries, subdivide the page's common
//! prefix into child partitions with skip-offsets, and continue the
//! originating prefix when the page was truncated. Child and continuation
//! coverage deliberately overlap; a seen-set makes the output exactly-once.

use std::collections::HashSet;

use async_stream::try_stream;
use futures::{Stream, StreamExt, pin_mut};
use ks_error::{Result, SweepError};
use tracing::debug;

use crate::alphabet::Alphabet;
use crate::config::SweepConfig;
use crate::output::Output;
use crate::pool::{FetchPool, FetchTask};
use crate::prefix::common_prefix;
use crate::stats::SweepStats;
use crate::store::{ObjectEntry, ObjectStore};

/// Enumerate every key under `config.prefix` as a lazy stream.
///
/// The stream is finite and non-restartable: it terminates when the task
/// frontier drains, or ends with the first unrecovered fetch error.
/// Dropping it cancels in-flight fetches and submits nothing further.
///
/// Entries within one page preserve store order; entries across
/// concurrently-resolving partitions have no defined relative order.
/// The pending frontier and the seen-set are unbounded; near-uniform key
/// distributions at shallow depths can grow both sharply.
pub fn sweep<'a, S: ObjectStore>(
    store: &'a S,
    bucket: &'a str,
    config: &SweepConfig,
) -> impl Stream<Item = Result<ObjectEntry>> + 'a {
    let config = config.clone();

    try_stream! {
        let mut pool = FetchPool::new(store, bucket, config.page_cap, config.concurrency);
        let mut seen: HashSet<String> = config.resume_keys.iter().cloned().collect();

        let mut hint = config.resume_keys.clone();
        hint.sort_unstable();
        spread(&mut pool, &config.alphabet, &config.prefix, &hint);

        debug!(
            bucket = %bucket,
            prefix = %config.prefix,
            seeded = pool.outstanding(),
            resume_keys = hint.len(),
            "Sweep seeded"
        );

        while let Some((task, result)) = pool.next_completed().await {
            let page = result?;
            debug!(
                prefix = %page.prefix,
                entries = page.entries.len(),
                outstanding = pool.outstanding(),
                "Page completed"
            );

            let keys: Vec<String> = page.entries.iter().map(|e| e.key.clone()).collect();
            for entry in page.entries {
                if seen.insert(entry.key.clone()) {
                    yield entry;
                }
            }

            // A shared run among the page's keys marks a partition dense
            // enough to subdivide, possibly several levels at once.
            let shared = common_prefix(&keys);
            if !shared.is_empty() {
                spread(&mut pool, &config.alphabet, &shared, &keys);
            }

            if let Some(token) = page.continuation {
                pool.submit(FetchTask::Continuation {
                    prefix: task.prefix().to_string(),
                    token,
                });
            }
        }

        debug!("Frontier drained");
    }
}

/// Submit one initial fetch per child of `prefix`.
///
/// `sorted_keys` must be ascending. Each child's offset is the smallest
/// already-seen key inside that child partition, so the fetch skips the
/// range those keys were delivered from; keys re-listed past the offset are
/// absorbed by the coordinator's seen-set.
fn spread<S: ObjectStore>(
    pool: &mut FetchPool<'_, S>,
    alphabet: &Alphabet,
    prefix: &str,
    sorted_keys: &[String],
) {
    for child in alphabet.children(prefix) {
        let start_after = sorted_keys
            .iter()
            .find(|key| key.starts_with(&child))
            .cloned()
            .unwrap_or_default();
        pool.submit(FetchTask::Initial {
            prefix: child,
            start_after,
        });
    }
}

/// Drives a sweep into an [`Output`], collecting [`SweepStats`].
///
/// Generic over the store and output so the same enumeration logic serves
/// real buckets, retries via a decorating store, and test doubles.
pub struct Sweeper<S: ObjectStore, O: Output> {
    store: S,
    bucket: String,
    output: O,
    config: SweepConfig,
}

impl<S: ObjectStore, O: Output> Sweeper<S, O> {
    /// Create a new Sweeper.
    pub fn new(store: S, bucket: impl Into<String>, output: O, config: SweepConfig) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            output,
            config,
        }
    }

    /// Run the sweep to completion, the configured key limit, or the first
    /// unrecovered error.
    ///
    /// Entries delivered before a failure stand; the output is flushed on
    /// every exit path. An output that refuses an entry aborts the sweep as
    /// [`SweepError::ConsumerAbort`].
    pub async fn run(&self) -> Result<SweepStats> {
        let mut stats = SweepStats::new();

        debug!(
            bucket = %self.bucket,
            prefix = %self.config.prefix,
            concurrency = self.config.concurrency,
            page_cap = self.config.page_cap,
            "Starting sweep"
        );

        let failure = {
            let stream = sweep(&self.store, &self.bucket, &self.config);
            pin_mut!(stream);

            let mut failure = None;
            while let Some(result) = stream.next().await {
                match result {
                    Err(e) => {
                        failure = Some(e);
                        break;
                    }
                    Ok(entry) => {
                        if let Err(e) = self.output.write(&entry).await {
                            failure = Some(SweepError::ConsumerAbort(format!(
                                "output rejected {}: {e}",
                                entry.key
                            )));
                            break;
                        }
                        stats.record_key(entry.size);

                        if self.config.max_keys > 0 && stats.keys_found >= self.config.max_keys {
                            debug!(max_keys = self.config.max_keys, "Reached key limit");
                            break;
                        }
                    }
                }
            }
            failure
        };

        if let Err(e) = self.output.flush().await {
            stats.record_error(format!("flush failed: {e}"));
        }

        stats.complete();

        debug!(
            keys = stats.keys_found,
            bytes = stats.bytes_found,
            errors = stats.errors.len(),
            "Sweep finished"
        );

        match failure {
            Some(e) => Err(e),
            None => Ok(stats),
        }
    }
}
