//! Opt-in retry collaborator for page fetches.
//!
//! The fetch path itself never retries; callers who want resilience wrap
//! their store in [`RetryingStore`], which reissues transient failures with
//! exponential backoff and jitter.

use std::time::Duration;

use async_trait::async_trait;
use ks_error::{ErrorCategory, Result, SweepError, classify};
use rand::Rng;
use tokio::time::sleep;
use tracing::warn;

use crate::store::{ListFrom, ObjectStore, Page};

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries before giving up.
    pub max_retries: u32,
    /// Initial backoff duration in milliseconds.
    pub initial_backoff_ms: u64,
    /// Maximum backoff duration in milliseconds.
    pub max_backoff_ms: u64,
    /// Whether to add jitter to backoff times.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10000,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the initial backoff in milliseconds.
    pub fn with_initial_backoff_ms(mut self, initial_backoff_ms: u64) -> Self {
        self.initial_backoff_ms = initial_backoff_ms;
        self
    }

    /// Set the maximum backoff in milliseconds.
    pub fn with_max_backoff_ms(mut self, max_backoff_ms: u64) -> Self {
        self.max_backoff_ms = max_backoff_ms;
        self
    }

    /// Enable or disable jitter.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Calculate the backoff duration for a given attempt.
    pub fn backoff_duration(&self, attempt: u32) -> Duration {
        let base_ms = self
            .initial_backoff_ms
            .saturating_mul(2u64.saturating_pow(attempt));
        let capped_ms = base_ms.min(self.max_backoff_ms);

        let final_ms = if self.jitter {
            let jitter_range = capped_ms / 4;
            let jitter = rand::rng().random_range(0..=jitter_range);
            capped_ms.saturating_add(jitter)
        } else {
            capped_ms
        };

        Duration::from_millis(final_ms)
    }
}

/// Execute an async operation, reissuing transient failures.
///
/// Permanent failures (auth, store shape, configuration) return
/// immediately; transient ones back off exponentially up to
/// `config.max_retries` reissues.
pub async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_error: Option<SweepError> = None;

    for attempt in 0..=config.max_retries {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if classify(&e) == ErrorCategory::Permanent {
                    warn!(
                        operation = operation_name,
                        attempt = attempt,
                        error = %e,
                        "Non-retryable error"
                    );
                    return Err(e);
                }

                if attempt < config.max_retries {
                    let backoff = config.backoff_duration(attempt);
                    warn!(
                        operation = operation_name,
                        attempt = attempt,
                        error = %e,
                        backoff_ms = backoff.as_millis() as u64,
                        "Retryable error, backing off"
                    );
                    sleep(backoff).await;
                }

                last_error = Some(e);
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| SweepError::Config("retry loop finished without attempts".to_string())))
}

/// Store decorator that retries transient listing failures.
#[derive(Debug, Clone)]
pub struct RetryingStore<S> {
    inner: S,
    config: RetryConfig,
}

impl<S> RetryingStore<S> {
    /// Wrap a store with the given retry configuration.
    pub fn new(inner: S, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: ObjectStore> ObjectStore for RetryingStore<S> {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        from: &ListFrom,
        page_cap: usize,
    ) -> Result<Page> {
        with_retry(&self.config, "list_page", || {
            self.inner.list_page(bucket, prefix, from, page_cap)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_retry_config_defaults() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.initial_backoff_ms, 100);
        assert_eq!(config.max_backoff_ms, 10000);
        assert!(config.jitter);
    }

    #[test]
    fn test_backoff_duration_no_jitter() {
        let config = RetryConfig::new()
            .with_initial_backoff_ms(100)
            .with_max_backoff_ms(10000)
            .with_jitter(false);

        assert_eq!(config.backoff_duration(0), Duration::from_millis(100));
        assert_eq!(config.backoff_duration(1), Duration::from_millis(200));
        assert_eq!(config.backoff_duration(2), Duration::from_millis(400));
    }

    #[test]
    fn test_backoff_duration_capped() {
        let config = RetryConfig::new()
            .with_initial_backoff_ms(1000)
            .with_max_backoff_ms(2000)
            .with_jitter(false);

        assert_eq!(config.backoff_duration(0), Duration::from_millis(1000));
        assert_eq!(config.backoff_duration(1), Duration::from_millis(2000));
        assert_eq!(config.backoff_duration(10), Duration::from_millis(2000));
    }

    #[tokio::test]
    async fn test_with_retry_success_first_try() {
        let config = RetryConfig::new();
        let mut calls = 0;

        let result = with_retry(&config, "test_op", || {
            calls += 1;
            async { Ok(42) }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_with_retry_recovers_from_transient() {
        let config = RetryConfig::new()
            .with_initial_backoff_ms(1)
            .with_jitter(false);
        let calls = AtomicU32::new(0);

        let result = with_retry(&config, "test_op", || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 2 {
                    Err(SweepError::Transport("connection reset".to_string()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_with_retry_permanent_fails_fast() {
        let config = RetryConfig::new();
        let calls = AtomicU32::new(0);

        let result: Result<u32> = with_retry(&config, "test_op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(SweepError::Auth("AccessDenied".to_string())) }
        })
        .await;

        assert!(matches!(result, Err(SweepError::Auth(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_with_retry_exhaustion_returns_last_error() {
        let config = RetryConfig::new()
            .with_max_retries(2)
            .with_initial_backoff_ms(1)
            .with_jitter(false);
        let calls = AtomicU32::new(0);

        let result: Result<u32> = with_retry(&config, "test_op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(SweepError::Transport("timeout".to_string())) }
        })
        .await;

        assert!(matches!(result, Err(SweepError::Transport(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    /// Store that fails with a transient error a fixed number of times
    /// before delegating.
    struct FlakyStore {
        inner: MemoryStore,
        failures: AtomicU32,
    }

    #[async_trait]
    impl ObjectStore for FlakyStore {
        async fn list_page(
            &self,
            bucket: &str,
            prefix: &str,
            from: &ListFrom,
            page_cap: usize,
        ) -> Result<Page> {
            if self.failures.load(Ordering::SeqCst) > 0 {
                self.failures.fetch_sub(1, Ordering::SeqCst);
                return Err(SweepError::Transport("connection reset".to_string()));
            }
            self.inner.list_page(bucket, prefix, from, page_cap).await
        }
    }

    #[tokio::test]
    async fn test_retrying_store_recovers() {
        let store = RetryingStore::new(
            FlakyStore {
                inner: MemoryStore::from_keys(["a1"]),
                failures: AtomicU32::new(2),
            },
            RetryConfig::new()
                .with_initial_backoff_ms(1)
                .with_jitter(false),
        );

        let page = store
            .list_page("bucket", "a", &ListFrom::Start, 10)
            .await
            .unwrap();
        assert_eq!(page.entries.len(), 1);
    }
}
