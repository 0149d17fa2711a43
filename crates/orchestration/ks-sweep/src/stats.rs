//! Statistics for enumeration runs.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Statistics collected while driving a sweep.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepStats {
    /// When the sweep started
    pub started_at: Option<DateTime<Utc>>,

    /// When the sweep completed
    pub completed_at: Option<DateTime<Utc>>,

    /// Number of keys delivered to the output
    pub keys_found: usize,

    /// Total bytes of delivered entries
    pub bytes_found: u64,

    /// Errors encountered outside the fetch path (output delivery, flush)
    pub errors: Vec<String>,
}

impl SweepStats {
    /// Create a stats tracker with the current time as start time.
    pub fn new() -> Self {
        Self {
            started_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Mark the sweep as complete with the current time.
    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Record one delivered entry.
    pub fn record_key(&mut self, size: u64) {
        self.keys_found += 1;
        self.bytes_found += size;
    }

    /// Record an error.
    pub fn record_error(&mut self, error: impl ToString) {
        self.errors.push(error.to_string());
    }

    /// Duration of the run, if complete.
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Whether any errors were recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Delivered keys per second over the run.
    pub fn keys_per_second(&self) -> Option<f64> {
        self.duration().map(|d| {
            let secs = d.num_milliseconds() as f64 / 1000.0;
            if secs > 0.0 {
                self.keys_found as f64 / secs
            } else {
                0.0
            }
        })
    }
}
