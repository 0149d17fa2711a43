//! CSV file output implementation.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use ks_error::{Result, SweepError};

use super::Output;
use crate::store::ObjectEntry;

/// CSV file output.
///
/// One row per entry with columns `etag,last_modified,s3_path,size`, where
/// `s3_path` is the full `s3://bucket/key` URI. Rows are buffered and
/// flushed when the sweep stops.
pub struct CsvOutput {
    bucket: String,
    writer: Mutex<BufWriter<File>>,
}

impl CsvOutput {
    /// Create (or truncate) the CSV file at `path` and write the header.
    pub fn create(path: impl AsRef<Path>, bucket: impl Into<String>) -> Result<Self> {
        let file = File::create(path.as_ref())
            .map_err(|e| SweepError::Config(format!("Failed to create CSV output: {e}")))?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "etag,last_modified,s3_path,size")
            .map_err(|e| SweepError::Config(format!("Failed to write CSV header: {e}")))?;

        Ok(Self {
            bucket: bucket.into(),
            writer: Mutex::new(writer),
        })
    }
}

#[async_trait]
impl Output for CsvOutput {
    async fn write(&self, entry: &ObjectEntry) -> Result<()> {
        // Stores quote etags on the wire; strip that before writing
        let etag = entry.etag.as_deref().unwrap_or("").trim_matches('"');
        let last_modified = entry
            .last_modified
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        let path = format!("s3://{}/{}", self.bucket, entry.key);

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| SweepError::Config("CSV writer poisoned".to_string()))?;
        writeln!(
            writer,
            "{},{},{},{}",
            quote(etag),
            quote(&last_modified),
            quote(&path),
            entry.size
        )
        .map_err(|e| SweepError::Config(format!("Failed to write CSV row: {e}")))?;
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        self.writer
            .lock()
            .map_err(|_| SweepError::Config("CSV writer poisoned".to_string()))?
            .flush()
            .map_err(|e| SweepError::Config(format!("Failed to flush CSV output: {e}")))?;
        Ok(())
    }
}

/// Quote a field when it contains a separator, quote, or line break.
fn quote(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
