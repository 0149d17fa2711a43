//! The page-fetching seam between the coordinator and a concrete object store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ks_error::Result;
use serde::{Deserialize, Serialize};

/// Default number of entries requested per listing page.
pub const DEFAULT_PAGE_CAP: usize = 1000;

/// One enumerated object.
///
/// The payload fields (etag, timestamp, size) are passed through from the
/// store unmodified; enumeration never interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectEntry {
    /// The object key (full path within the bucket)
    pub key: String,

    /// Entity tag as reported by the store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Last modified timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,

    /// Size of the object in bytes
    pub size: u64,
}

/// Where a listing resumes within a prefix partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFrom {
    /// From the beginning of the partition.
    Start,
    /// Keys strictly greater than the given key.
    After(String),
    /// From an opaque continuation marker returned by a previous page.
    Token(String),
}

/// One bounded-size listing response.
#[derive(Debug, Clone)]
pub struct Page {
    /// The prefix the request was scoped to.
    pub prefix: String,
    /// Matching entries, in the store's ascending key order.
    pub entries: Vec<ObjectEntry>,
    /// Present iff more entries remain for this exact prefix.
    pub continuation: Option<String>,
}

/// A paginated, prefix-filterable object store.
///
/// Contract:
/// - entries are strictly greater than the resume point and all match
///   `prefix`, at most `page_cap` of them;
/// - entries arrive in strictly ascending key order — this is a
///   precondition the coordinator's offset derivation relies on, not
///   something it defends against;
/// - `continuation` is present iff more entries remain for this prefix;
/// - errors propagate unmodified: implementations do not retry or mask.
///   Retry belongs to a decorating store, not the fetch itself.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch one page of keys under `prefix`, resuming at `from`.
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        from: &ListFrom,
        page_cap: usize,
    ) -> Result<Page>;
}
