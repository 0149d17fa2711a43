//! keysweep CLI
//!
//! Concurrent keyspace enumeration for S3-compatible object stores.

use clap::Parser;

mod args;
mod progress;
mod run;

use args::Cli;
use progress::format_bytes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Initialize logging (to stderr, so stdout is clean for entries)
    run::init_logging(args.log_level)?;

    // Run the sweep
    let stats = run::execute(args).await?;

    // Report results to stderr
    eprintln!();
    eprintln!("Sweep completed:");
    eprintln!("  Keys found:  {}", stats.keys_found);
    eprintln!("  Total size:  {}", format_bytes(stats.bytes_found));

    if let Some(duration) = stats.duration() {
        eprintln!(
            "  Duration:    {:.2}s",
            duration.num_milliseconds() as f64 / 1000.0
        );

        if let Some(kps) = stats.keys_per_second() {
            eprintln!("  Throughput:  {:.1} keys/sec", kps);
        }
    }

    if stats.has_errors() {
        for error in &stats.errors {
            eprintln!("  Error: {}", error);
        }
        std::process::exit(4); // Delivered everything, but cleanup failed
    }

    Ok(())
}
