//! Configuration for an enumeration run.

use crate::alphabet::Alphabet;
use crate::store::DEFAULT_PAGE_CAP;

/// Default number of concurrently running fetches.
pub const DEFAULT_CONCURRENCY: usize = 30;

/// Configuration for one sweep of a bucket.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Root prefix to enumerate under (empty = whole bucket).
    pub prefix: String,

    /// Maximum concurrently running fetches.
    pub concurrency: usize,

    /// Maximum entries requested per listing page.
    pub page_cap: usize,

    /// Stop after this many keys (0 = unlimited). Applied by the driver,
    /// not the stream.
    pub max_keys: usize,

    /// Alphabet used to subdivide dense partitions.
    pub alphabet: Alphabet,

    /// Previously-seen keys. Seeds per-branch offsets so already-known
    /// ranges are skipped, and guarantees none of these keys is
    /// re-delivered. Correctness of the skip depends on the hint being
    /// accurate and contiguous for the range it covers.
    pub resume_keys: Vec<String>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            concurrency: DEFAULT_CONCURRENCY,
            page_cap: DEFAULT_PAGE_CAP,
            max_keys: 0,
            alphabet: Alphabet::default(),
            resume_keys: Vec::new(),
        }
    }
}

impl SweepConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the maximum number of concurrent fetches.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the per-page entry cap.
    pub fn with_page_cap(mut self, page_cap: usize) -> Self {
        self.page_cap = page_cap.max(1);
        self
    }

    /// Set the key limit (0 = unlimited).
    pub fn with_max_keys(mut self, max_keys: usize) -> Self {
        self.max_keys = max_keys;
        self
    }

    /// Set the partitioning alphabet.
    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    /// Set the resume hint.
    pub fn with_resume_keys(mut self, resume_keys: Vec<String>) -> Self {
        self.resume_keys = resume_keys;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SweepConfig::new();
        assert_eq!(config.prefix, "");
        assert_eq!(config.concurrency, 30);
        assert_eq!(config.page_cap, 1000);
        assert_eq!(config.max_keys, 0);
        assert_eq!(config.alphabet.len(), 71);
        assert!(config.resume_keys.is_empty());
    }

    #[test]
    fn test_builder() {
        let config = SweepConfig::new()
            .with_prefix("logs/")
            .with_concurrency(4)
            .with_page_cap(100)
            .with_max_keys(5000)
            .with_resume_keys(vec!["logs/a".to_string()]);

        assert_eq!(config.prefix, "logs/");
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.page_cap, 100);
        assert_eq!(config.max_keys, 5000);
        assert_eq!(config.resume_keys.len(), 1);
    }

    #[test]
    fn test_floors_degenerate_values() {
        let config = SweepConfig::new().with_concurrency(0).with_page_cap(0);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.page_cap, 1);
    }
}
