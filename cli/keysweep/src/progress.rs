//! Progress reporting for long sweeps.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Periodic stderr progress reporter.
///
/// Recording happens through cheap [`ProgressTracker`] clones; a background
/// task prints a line per interval until stopped.
pub struct ProgressReporter {
    /// Whether progress reporting is enabled
    enabled: bool,
    /// Reporting interval
    interval: Duration,
    /// Shared state for progress tracking
    state: Arc<ProgressState>,
    /// Handle to the background reporter task
    handle: Option<JoinHandle<()>>,
}

/// Shared state for progress tracking.
struct ProgressState {
    /// Number of keys delivered
    keys_found: AtomicUsize,
    /// Total bytes of delivered entries
    bytes_found: AtomicU64,
    /// Whether to stop reporting
    stop: AtomicBool,
    /// Start time
    start_time: Instant,
}

/// Recording handle shared with the output path.
#[derive(Clone)]
pub struct ProgressTracker {
    enabled: bool,
    state: Arc<ProgressState>,
}

impl ProgressTracker {
    /// Record one delivered entry.
    pub fn record(&self, size: u64) {
        if self.enabled {
            self.state.keys_found.fetch_add(1, Ordering::Relaxed);
            self.state.bytes_found.fetch_add(size, Ordering::Relaxed);
        }
    }
}

impl ProgressReporter {
    /// Create a new progress reporter.
    pub fn new(enabled: bool, interval_secs: u64) -> Self {
        Self {
            enabled,
            interval: Duration::from_secs(interval_secs.max(1)),
            state: Arc::new(ProgressState {
                keys_found: AtomicUsize::new(0),
                bytes_found: AtomicU64::new(0),
                stop: AtomicBool::new(false),
                start_time: Instant::now(),
            }),
            handle: None,
        }
    }

    /// A recording handle for the output path.
    pub fn tracker(&self) -> ProgressTracker {
        ProgressTracker {
            enabled: self.enabled,
            state: Arc::clone(&self.state),
        }
    }

    /// Start the background progress reporter.
    pub fn start(&mut self) {
        if !self.enabled {
            return;
        }

        let state = Arc::clone(&self.state);
        let interval = self.interval;

        let handle = tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.tick().await; // Skip first immediate tick

            loop {
                interval_timer.tick().await;

                if state.stop.load(Ordering::Relaxed) {
                    break;
                }

                let keys = state.keys_found.load(Ordering::Relaxed);
                let bytes = state.bytes_found.load(Ordering::Relaxed);
                let elapsed = state.start_time.elapsed();

                let _ = writeln!(
                    io::stderr(),
                    "[Progress] {} keys, {} found ({:.1}s elapsed)",
                    keys,
                    format_bytes(bytes),
                    elapsed.as_secs_f64()
                );
            }
        });

        self.handle = Some(handle);
    }

    /// Stop the progress reporter and print final stats.
    pub async fn stop(mut self) {
        if !self.enabled {
            return;
        }

        self.state.stop.store(true, Ordering::Relaxed);

        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }

        let keys = self.state.keys_found.load(Ordering::Relaxed);
        let bytes = self.state.bytes_found.load(Ordering::Relaxed);
        let elapsed = self.state.start_time.elapsed();

        let _ = writeln!(
            io::stderr(),
            "[Progress] Complete: {} keys, {} ({:.1}s)",
            keys,
            format_bytes(bytes),
            elapsed.as_secs_f64()
        );
    }
}

/// Format bytes as a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;
    const TB: u64 = 1024 * GB;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
