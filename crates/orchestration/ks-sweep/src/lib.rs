//! ks-sweep - concurrent keyspace enumeration for S3-compatible stores.
//!
//! Listing a bucket through a paginated API is latency-bound: one page of
//! at most 1000 keys per round trip. This crate enumerates a bucket by
//! fanning out many concurrent listing requests and dynamically subdividing
//! the keyspace wherever a partition is too dense for a single page:
//!
//! - a fixed key alphabet partitions any prefix into disjoint children;
//! - the longest common prefix of a returned page decides how deep a
//!   subdivision can jump in one step;
//! - a bounded worker pool reports completions in arrival order, so dense
//!   partitions never stall sparse ones;
//! - the coordinator owns the task frontier, dedupes overlapping coverage,
//!   and yields one lazy stream of entries.
//!
//! # Example
//!
//! ```ignore
//! use futures::{StreamExt, pin_mut};
//! use ks_sweep::{S3Config, S3Store, SweepConfig, create_s3_client, sweep};
//!
//! let client = create_s3_client(&S3Config::new()).await?;
//! let store = S3Store::new(client);
//! let config = SweepConfig::new().with_prefix("logs/").with_concurrency(30);
//!
//! let entries = sweep(&store, "my-bucket", &config);
//! pin_mut!(entries);
//!
//! while let Some(entry) = entries.next().await {
//!     let entry = entry?;
//!     println!("{} ({} bytes)", entry.key, entry.size);
//! }
//! ```

pub mod alphabet;
pub mod config;
pub mod memory;
pub mod output;
pub mod pool;
pub mod prefix;
pub mod s3;
pub mod stats;
pub mod store;
pub mod sweep;

pub use alphabet::Alphabet;
pub use config::{DEFAULT_CONCURRENCY, SweepConfig};
pub use memory::MemoryStore;
pub use output::{CsvOutput, Output, OutputFormat, StdoutOutput};
pub use pool::{FetchPool, FetchTask};
pub use prefix::common_prefix;
pub use s3::{RetryConfig, RetryingStore, S3Config, S3Store, create_s3_client, with_retry};
pub use stats::SweepStats;
pub use store::{DEFAULT_PAGE_CAP, ListFrom, ObjectEntry, ObjectStore, Page};
pub use sweep::{Sweeper, sweep};
