//! Deterministic in-memory object store.
//!
//! Reference implementation of the [`ObjectStore`] pagination contract and
//! the test double for enumeration properties. Keys live in a `BTreeMap`,
//! so pages are sorted by construction. Optional artificial latency and
//! request recording let tests observe scheduling behavior.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use ks_error::{Result, SweepError};

use crate::store::{ListFrom, ObjectStore, ObjectEntry, Page};

/// In-memory [`ObjectStore`] over a sorted key map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: BTreeMap<String, ObjectEntry>,
    latency: Option<Duration>,
    prefix_latency: Vec<(String, Duration)>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    requests: Mutex<Vec<(String, ListFrom)>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given keys, with sizes derived from key
    /// length so byte counters have something to add up.
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let mut store = Self::new();
        for key in keys {
            let key = key.into();
            store.insert(ObjectEntry {
                size: key.len() as u64,
                etag: None,
                last_modified: None,
                key,
            });
        }
        store
    }

    /// Insert one entry, replacing any existing entry for the same key.
    pub fn insert(&mut self, entry: ObjectEntry) {
        self.objects.insert(entry.key.clone(), entry);
    }

    /// Add a fixed delay to every `list_page` call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Add a delay to `list_page` calls whose requested prefix starts with
    /// `prefix`, for skewing completion order in tests.
    pub fn with_prefix_latency(mut self, prefix: impl Into<String>, latency: Duration) -> Self {
        self.prefix_latency.push((prefix.into(), latency));
        self
    }

    /// Number of keys in the store.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Highest number of concurrently executing `list_page` calls observed.
    pub fn max_concurrent_seen(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Every `(prefix, from)` request received, in arrival order.
    pub fn recorded_requests(&self) -> Vec<(String, ListFrom)> {
        self.requests
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    fn delay_for(&self, prefix: &str) -> Option<Duration> {
        let extra = self
            .prefix_latency
            .iter()
            .find(|(p, _)| prefix.starts_with(p))
            .map(|(_, d)| *d);
        match (self.latency, extra) {
            (Some(base), Some(extra)) => Some(base + extra),
            (base, extra) => base.or(extra),
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_page(
        &self,
        _bucket: &str,
        prefix: &str,
        from: &ListFrom,
        page_cap: usize,
    ) -> Result<Page> {
        self.requests
            .lock()
            .map_err(|_| SweepError::Config("request log poisoned".to_string()))?
            .push((prefix.to_string(), from.clone()));

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Some(delay) = self.delay_for(prefix) {
            tokio::time::sleep(delay).await;
        }

        // The continuation marker is simply the last key of the previous
        // page, which resumes exactly like a start-after offset.
        let after = match from {
            ListFrom::Start => None,
            ListFrom::After(key) | ListFrom::Token(key) => Some(key.as_str()),
        };
        let lower = match after {
            Some(key) if key >= prefix => Bound::Excluded(key.to_string()),
            _ => Bound::Included(prefix.to_string()),
        };

        let mut entries = Vec::new();
        let mut truncated = false;
        for (key, entry) in self.objects.range((lower, Bound::Unbounded)) {
            if !key.starts_with(prefix) {
                // Sorted order: the prefix's key run is contiguous
                break;
            }
            if entries.len() == page_cap {
                truncated = true;
                break;
            }
            entries.push(entry.clone());
        }

        let continuation = if truncated {
            entries.last().map(|e: &ObjectEntry| e.key.clone())
        } else {
            None
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        Ok(Page {
            prefix: prefix.to_string(),
            entries,
            continuation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn page(store: &MemoryStore, prefix: &str, from: ListFrom, cap: usize) -> Page {
        store.list_page("bucket", prefix, &from, cap).await.unwrap()
    }

    fn keys(page: &Page) -> Vec<&str> {
        page.entries.iter().map(|e| e.key.as_str()).collect()
    }

    #[tokio::test]
    async fn test_lists_only_prefix_matches_in_order() {
        let store = MemoryStore::from_keys(["a1", "a2", "b1", "a3"]);
        let page = page(&store, "a", ListFrom::Start, 10).await;
        assert_eq!(keys(&page), vec!["a1", "a2", "a3"]);
        assert!(page.continuation.is_none());
    }

    #[tokio::test]
    async fn test_page_cap_and_continuation() {
        let store = MemoryStore::from_keys(["a1", "a2", "a3"]);
        let first = page(&store, "a", ListFrom::Start, 2).await;
        assert_eq!(keys(&first), vec!["a1", "a2"]);
        let token = first.continuation.expect("truncated page carries a token");

        let second = page(&store, "a", ListFrom::Token(token), 2).await;
        assert_eq!(keys(&second), vec!["a3"]);
        assert!(second.continuation.is_none());
    }

    #[tokio::test]
    async fn test_start_after_is_strict() {
        let store = MemoryStore::from_keys(["a1", "a2"]);
        let page = page(&store, "a", ListFrom::After("a1".to_string()), 10).await;
        assert_eq!(keys(&page), vec!["a2"]);
    }

    #[tokio::test]
    async fn test_exact_cap_boundary_has_no_token() {
        let store = MemoryStore::from_keys(["a1", "a2"]);
        let page = page(&store, "a", ListFrom::Start, 2).await;
        assert_eq!(page.entries.len(), 2);
        assert!(page.continuation.is_none());
    }

    #[tokio::test]
    async fn test_offset_below_prefix_starts_at_prefix() {
        let store = MemoryStore::from_keys(["b1", "b2"]);
        let page = page(&store, "b", ListFrom::After("a9".to_string()), 10).await;
        assert_eq!(keys(&page), vec!["b1", "b2"]);
    }

    #[tokio::test]
    async fn test_records_requests() {
        let store = MemoryStore::from_keys(["a1"]);
        let _ = page(&store, "a", ListFrom::Start, 10).await;
        let requests = store.recorded_requests();
        assert_eq!(requests, vec![("a".to_string(), ListFrom::Start)]);
    }
}
