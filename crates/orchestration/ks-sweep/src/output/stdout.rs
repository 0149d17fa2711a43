//! Stdout output implementation.

use async_trait::async_trait;
use ks_error::{Result, SweepError};
use serde::{Deserialize, Serialize};
use std::io::Write;

use super::Output;
use crate::store::ObjectEntry;

/// Output format for stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON Lines format - one JSON object per line (default)
    #[default]
    Jsonl,

    /// Pretty-printed JSON
    Json,
}

/// Stdout output implementation.
///
/// JSONL (one object per line) suits piping into `jq` or counting with
/// `wc -l`; logging goes to stderr, so stdout stays machine-readable.
pub struct StdoutOutput {
    format: OutputFormat,
}

impl StdoutOutput {
    /// Create a new StdoutOutput with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Create a new StdoutOutput with JSONL format (default).
    pub fn jsonl() -> Self {
        Self::new(OutputFormat::Jsonl)
    }

    /// Create a new StdoutOutput with pretty-printed JSON format.
    pub fn json() -> Self {
        Self::new(OutputFormat::Json)
    }
}

impl Default for StdoutOutput {
    fn default() -> Self {
        Self::jsonl()
    }
}

#[async_trait]
impl Output for StdoutOutput {
    async fn write(&self, entry: &ObjectEntry) -> Result<()> {
        let line = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(entry)
                .map_err(|e| SweepError::Config(format!("JSON serialization failed: {e}")))?,
            OutputFormat::Jsonl => serde_json::to_string(entry)
                .map_err(|e| SweepError::Config(format!("JSON serialization failed: {e}")))?,
        };

        println!("{line}");
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        std::io::stdout()
            .flush()
            .map_err(|e| SweepError::Config(format!("Failed to flush stdout: {e}")))?;
        Ok(())
    }
}
