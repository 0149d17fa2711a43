//! S3 client configuration and the S3-backed page fetcher.
//!
//! - Client construction with custom-endpoint (LocalStack/MinIO) support
//! - [`S3Store`]: the `ObjectStore` implementation over ListObjectsV2
//! - [`RetryingStore`]: opt-in retry decorator with exponential backoff

mod client;
mod retry;
mod store;

pub use client::{S3Config, create_s3_client};
pub use retry::{RetryConfig, RetryingStore, with_retry};
pub use store::S3Store;
