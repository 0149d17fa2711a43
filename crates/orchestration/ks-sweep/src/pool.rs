//! Bounded-concurrency scheduler for page fetches.
//!
//! The pool runs at most `workers` fetches at a time and reports completions
//! in arrival order, so a dense partition never blocks progress on a sparse
//! one. New tasks may be submitted while others remain outstanding; the
//! frontier is the in-flight future set itself.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use ks_error::{Result, SweepError};
use tokio::sync::Semaphore;

use crate::store::{ListFrom, ObjectStore, Page};

/// One unit of enumeration work: a single bounded listing request.
///
/// Created by the coordinator (seed, split, or continuation), consumed
/// exactly once by a fetch, and destroyed by the page it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchTask {
    /// First fetch of a partition, optionally skipping past already-seen keys.
    Initial {
        /// The partition being fetched.
        prefix: String,
        /// Resume point; empty means the start of the partition.
        start_after: String,
    },
    /// Follow-up fetch of a partition whose previous page was truncated.
    Continuation {
        /// The partition being fetched.
        prefix: String,
        /// Opaque marker from the previous page.
        token: String,
    },
}

impl FetchTask {
    /// The partition this task fetches.
    pub fn prefix(&self) -> &str {
        match self {
            FetchTask::Initial { prefix, .. } => prefix,
            FetchTask::Continuation { prefix, .. } => prefix,
        }
    }

    /// The store-facing resume point for this task.
    pub fn from(&self) -> ListFrom {
        match self {
            FetchTask::Initial { start_after, .. } if start_after.is_empty() => ListFrom::Start,
            FetchTask::Initial { start_after, .. } => ListFrom::After(start_after.clone()),
            FetchTask::Continuation { token, .. } => ListFrom::Token(token.clone()),
        }
    }
}

/// Bounded-concurrency executor for [`FetchTask`]s.
///
/// Dropping the pool cancels every in-flight fetch and discards pending
/// permits, which is how the coordinator releases resources on early exit.
pub struct FetchPool<'a, S: ObjectStore> {
    store: &'a S,
    bucket: &'a str,
    page_cap: usize,
    limiter: Arc<Semaphore>,
    inflight: FuturesUnordered<BoxFuture<'a, (FetchTask, Result<Page>)>>,
}

impl<'a, S: ObjectStore> FetchPool<'a, S> {
    /// Create a pool running at most `workers` concurrent fetches.
    pub fn new(store: &'a S, bucket: &'a str, page_cap: usize, workers: usize) -> Self {
        Self {
            store,
            bucket,
            page_cap,
            limiter: Arc::new(Semaphore::new(workers.max(1))),
            inflight: FuturesUnordered::new(),
        }
    }

    /// Submit a task; it starts as soon as a worker permit frees up.
    pub fn submit(&mut self, task: FetchTask) {
        let store = self.store;
        let bucket = self.bucket;
        let page_cap = self.page_cap;
        let limiter = Arc::clone(&self.limiter);

        self.inflight.push(Box::pin(async move {
            let result = match limiter.acquire_owned().await {
                Ok(_permit) => {
                    let from = task.from();
                    store.list_page(bucket, task.prefix(), &from, page_cap).await
                }
                Err(e) => Err(SweepError::Config(format!("fetch limiter closed: {e}"))),
            };
            (task, result)
        }));
    }

    /// Wait for whichever outstanding fetch finishes first.
    ///
    /// Returns `None` once the frontier is empty.
    pub async fn next_completed(&mut self) -> Option<(FetchTask, Result<Page>)> {
        self.inflight.next().await
    }

    /// Number of tasks not yet resolved.
    pub fn outstanding(&self) -> usize {
        self.inflight.len()
    }

    /// Whether the frontier is empty.
    pub fn is_empty(&self) -> bool {
        self.inflight.is_empty()
    }
}
