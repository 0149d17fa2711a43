//! Sweep integration tests using LocalStack.
//!
//! These verify that the full enumeration path works against a real
//! ListObjectsV2 implementation, including pagination and resume hints.

use crate::common::LocalStackTestContext;
use futures::{StreamExt, pin_mut};
use ks_sweep::{S3Store, SweepConfig, sweep};

async fn collect_keys(store: &S3Store, bucket: &str, config: &SweepConfig) -> Vec<String> {
    let stream = sweep(store, bucket, config);
    pin_mut!(stream);

    let mut keys = Vec::new();
    while let Some(result) = stream.next().await {
        keys.push(result.expect("sweep failed").key);
    }
    keys.sort_unstable();
    keys
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_sweep_small_bucket() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "test-sweep-bucket";
    ctx.create_bucket(bucket).await.unwrap();

    let uploaded = ["data/a1", "data/a2", "data/b1", "other/c1"];
    for key in &uploaded {
        ctx.put_object(bucket, key, "payload").await.unwrap();
    }

    let store = S3Store::new(ctx.s3.clone());
    let keys = collect_keys(&store, bucket, &SweepConfig::new()).await;

    assert_eq!(keys, uploaded);

    for key in &uploaded {
        ctx.delete_object(bucket, key).await.ok();
    }
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_sweep_subdivides_with_tiny_pages() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "test-sweep-pagination";
    ctx.create_bucket(bucket).await.unwrap();

    let uploaded: Vec<String> = (0..25).map(|i| format!("logs/2024/{i:03}")).collect();
    for key in &uploaded {
        ctx.put_object(bucket, key, "x").await.unwrap();
    }

    let store = S3Store::new(ctx.s3.clone());
    let config = SweepConfig::new().with_page_cap(3).with_concurrency(5);
    let keys = collect_keys(&store, bucket, &config).await;

    assert_eq!(keys, uploaded);

    for key in &uploaded {
        ctx.delete_object(bucket, key).await.ok();
    }
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_sweep_with_resume_hint() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let bucket = "test-sweep-resume";
    ctx.create_bucket(bucket).await.unwrap();

    for key in ["a1", "a2", "b1"] {
        ctx.put_object(bucket, key, "x").await.unwrap();
    }

    let store = S3Store::new(ctx.s3.clone());
    let config = SweepConfig::new().with_resume_keys(vec!["a1".to_string()]);
    let keys = collect_keys(&store, bucket, &config).await;

    assert_eq!(keys, ["a2", "b1"]);

    for key in ["a1", "a2", "b1"] {
        ctx.delete_object(bucket, key).await.ok();
    }
}
