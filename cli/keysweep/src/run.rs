//! Main execution logic for the keysweep CLI.

use anyhow::{Context, Result};
use async_trait::async_trait;
use ks_sweep::{
    CsvOutput, ObjectEntry, ObjectStore, Output, RetryConfig, RetryingStore, S3Config, S3Store,
    StdoutOutput, SweepConfig, SweepStats, Sweeper, create_s3_client,
};
use std::path::Path;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::args::{Cli, DestinationType, LogLevel};
use crate::progress::{ProgressReporter, ProgressTracker};

/// Initialize logging.
///
/// Logs go to stderr so stdout stays clean for enumerated entries.
pub fn init_logging(level: LogLevel) -> Result<()> {
    let level: Level = level.into();

    let subscriber = fmt::Subscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr);

    subscriber.init();

    Ok(())
}

/// Execute a sweep with the provided arguments.
pub async fn execute(args: Cli) -> Result<SweepStats> {
    // Build S3 configuration
    let mut s3_config = S3Config::new().with_region(&args.region);

    if let Some(endpoint) = &args.s3_endpoint {
        s3_config = s3_config.with_endpoint(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) = (&args.access_key, &args.secret_key) {
        s3_config =
            s3_config.with_credentials(access_key, secret_key, args.session_token.clone());
    }

    if let Some(profile) = &args.profile {
        s3_config = s3_config.with_profile(profile);
    }

    let client = create_s3_client(&s3_config).await?;

    // Build sweep configuration
    let resume_keys = match &args.resume_from {
        Some(path) => load_resume_keys(path)?,
        None => Vec::new(),
    };

    let config = SweepConfig::new()
        .with_prefix(&args.prefix)
        .with_concurrency(args.concurrency)
        .with_page_cap(args.page_cap)
        .with_max_keys(args.max_keys)
        .with_resume_keys(resume_keys);

    let mut progress = ProgressReporter::new(args.progress, args.progress_interval);
    progress.start();
    let tracker = progress.tracker();

    // Execute; retry is an opt-in store decorator, never part of the fetch
    let store = S3Store::new(client);
    let result = if args.max_retries > 0 {
        let retry = RetryConfig::new().with_max_retries(args.max_retries);
        run_with_destination(RetryingStore::new(store, retry), &args, config, tracker).await
    } else {
        run_with_destination(store, &args, config, tracker).await
    };

    progress.stop().await;
    result
}

/// Load the resume hint: one previously-seen key per line.
fn load_resume_keys(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read resume file {}", path.display()))?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Pick the destination and run the sweep against it.
async fn run_with_destination<S: ObjectStore>(
    store: S,
    args: &Cli,
    config: SweepConfig,
    tracker: ProgressTracker,
) -> Result<SweepStats> {
    match args.destination {
        DestinationType::Stdout => {
            let output = StdoutOutput::new(args.output_format.into());
            run_sweep(store, args, config, ProgressOutput::new(output, tracker)).await
        }
        DestinationType::Csv => {
            let output = CsvOutput::create(&args.csv_path, &args.bucket)?;
            run_sweep(store, args, config, ProgressOutput::new(output, tracker)).await
        }
    }
}

/// Run the sweep with a specific store and output type.
async fn run_sweep<S: ObjectStore, O: Output>(
    store: S,
    args: &Cli,
    config: SweepConfig,
    output: O,
) -> Result<SweepStats> {
    let sweeper = Sweeper::new(store, &args.bucket, output, config);
    let stats = sweeper.run().await?;
    Ok(stats)
}

/// Output decorator feeding the progress reporter.
struct ProgressOutput<O> {
    inner: O,
    tracker: ProgressTracker,
}

impl<O> ProgressOutput<O> {
    fn new(inner: O, tracker: ProgressTracker) -> Self {
        Self { inner, tracker }
    }
}

#[async_trait]
impl<O: Output> Output for ProgressOutput<O> {
    async fn write(&self, entry: &ObjectEntry) -> ks_error::Result<()> {
        self.inner.write(entry).await?;
        self.tracker.record(entry.size);
        Ok(())
    }

    async fn flush(&self) -> ks_error::Result<()> {
        self.inner.flush().await
    }
}
