//! CLI argument definitions for keysweep.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Concurrent S3 keyspace enumeration.
///
/// Lists every key under a bucket/prefix by fanning out concurrent listing
/// requests and subdividing dense key ranges on the fly. Entries go to
/// stdout in JSONL format by default; logging goes to stderr.
///
/// ## Examples
///
/// Basic usage:
///   keysweep -b my-bucket
///
/// Scoped to a prefix, into a CSV file:
///   keysweep -b my-bucket -p "logs/2024/" --destination csv --csv-path logs.csv
///
/// Against an S3-compatible endpoint:
///   keysweep -b my-bucket --s3-endpoint http://localhost:4566
///
/// Resuming after an aborted run (keys already written, one per line):
///   keysweep -b my-bucket --resume-from seen-keys.txt
#[derive(Parser, Debug)]
#[command(name = "keysweep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    // === S3 Configuration ===
    /// S3 bucket name
    #[arg(short, long, env = "KEYSWEEP_BUCKET")]
    pub bucket: String,

    /// Key prefix to enumerate under
    #[arg(short, long, env = "KEYSWEEP_PREFIX", default_value = "")]
    pub prefix: String,

    /// Custom S3 endpoint URL (LocalStack, MinIO, ...)
    #[arg(long, env = "AWS_ENDPOINT_URL_S3")]
    pub s3_endpoint: Option<String>,

    /// AWS region
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    pub region: String,

    /// AWS access key ID
    #[arg(long, env = "AWS_ACCESS_KEY_ID")]
    pub access_key: Option<String>,

    /// AWS secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY")]
    pub secret_key: Option<String>,

    /// AWS session token for temporary credentials
    #[arg(long, env = "AWS_SESSION_TOKEN")]
    pub session_token: Option<String>,

    /// AWS profile name
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    // === Sweep Options ===
    /// Maximum concurrent listing requests (must be >= 1)
    #[arg(long, default_value = "30", value_parser = parse_positive_usize)]
    pub concurrency: usize,

    /// Entries requested per listing page (1-1000)
    #[arg(long, default_value = "1000", value_parser = parse_page_cap)]
    pub page_cap: usize,

    /// Stop after this many keys (0 = unlimited)
    #[arg(long, default_value = "0")]
    pub max_keys: usize,

    /// File of previously-seen keys (one per line); their ranges are
    /// skipped and none of them is re-delivered
    #[arg(long)]
    pub resume_from: Option<PathBuf>,

    /// Retries per failed listing call (0 disables retry)
    #[arg(long, default_value = "3")]
    pub max_retries: u32,

    // === Destination Options ===
    /// Output destination type
    #[arg(long, value_enum, default_value = "stdout")]
    pub destination: DestinationType,

    /// Output format for stdout destination
    #[arg(long, value_enum, default_value = "jsonl")]
    pub output_format: OutputFormatArg,

    /// CSV file path (used when destination=csv)
    #[arg(long, default_value = "output.csv")]
    pub csv_path: PathBuf,

    // === Reporting Options ===
    /// Print progress to stderr while sweeping
    #[arg(long)]
    pub progress: bool,

    /// Progress reporting interval in seconds
    #[arg(long, default_value = "5")]
    pub progress_interval: u64,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/// Destination type.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DestinationType {
    /// Output to stdout
    Stdout,
    /// Write a CSV file
    Csv,
}

/// Output format argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    /// JSON Lines (one JSON object per line)
    Jsonl,
    /// Pretty-printed JSON
    Json,
}

impl From<OutputFormatArg> for ks_sweep::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Jsonl => ks_sweep::OutputFormat::Jsonl,
            OutputFormatArg::Json => ks_sweep::OutputFormat::Json,
        }
    }
}

/// Log level argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    /// Trace level (most verbose)
    Trace,
    /// Debug level
    Debug,
    /// Info level (default)
    Info,
    /// Warning level
    Warn,
    /// Error level (least verbose)
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Parse a positive usize (>= 1).
fn parse_positive_usize(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if value < 1 {
        return Err(format!("{} is not in 1..", value));
    }
    Ok(value)
}

/// Parse the page cap (1-1000).
fn parse_page_cap(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(1..=1000).contains(&value) {
        return Err(format!("{} is not in 1..=1000", value));
    }
    Ok(value)
}
