//! Output implementations for enumerated entries.
//!
//! This module provides the [`Output`] trait and implementations for
//! delivering entries to their destination:
//! - [`StdoutOutput`] - stdout in JSON or JSONL format
//! - [`CsvOutput`] - a CSV file with one row per entry

mod csv;
mod stdout;

pub use csv::CsvOutput;
pub use stdout::{OutputFormat, StdoutOutput};

use async_trait::async_trait;
use ks_error::Result;

use crate::store::ObjectEntry;

/// Trait for delivering enumerated entries.
///
/// Implementations decide serialization and destination. A returned error
/// tells the driver the consumer can take no more entries and aborts the
/// sweep.
#[async_trait]
pub trait Output: Send + Sync {
    /// Deliver a single entry.
    async fn write(&self, entry: &ObjectEntry) -> Result<()>;

    /// Flush any buffered output.
    ///
    /// Called once the sweep stops, on every exit path.
    async fn flush(&self) -> Result<()>;
}
