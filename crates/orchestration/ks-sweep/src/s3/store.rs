//! S3-backed page fetcher.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use chrono::DateTime;
use ks_error::{Result, SweepError};

use crate::store::{ListFrom, ObjectEntry, ObjectStore, Page};

/// [`ObjectStore`] over an S3 `ListObjectsV2` API.
///
/// Issues exactly one request per `list_page` call and propagates failures
/// unmodified, classified into the error taxonomy. S3 returns listing pages
/// in ascending key order, which satisfies the sorted-page precondition of
/// the trait contract.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Wrap an S3 client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// The underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        from: &ListFrom,
        page_cap: usize,
    ) -> Result<Page> {
        let mut req = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .max_keys(page_cap.min(i32::MAX as usize) as i32);

        if !prefix.is_empty() {
            req = req.prefix(prefix);
        }

        match from {
            ListFrom::Start => {}
            ListFrom::After(key) => req = req.start_after(key),
            ListFrom::Token(token) => req = req.continuation_token(token),
        }

        let resp = req.send().await.map_err(|e| classify_list_error(&e))?;

        let mut entries = Vec::new();
        if let Some(contents) = resp.contents {
            entries.reserve(contents.len());
            for obj in contents {
                let Some(key) = obj.key else {
                    return Err(SweepError::Store(
                        "listing entry without a key".to_string(),
                    ));
                };

                let last_modified = obj
                    .last_modified
                    .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()));

                entries.push(ObjectEntry {
                    key,
                    etag: obj.e_tag,
                    last_modified,
                    size: obj.size.unwrap_or(0) as u64,
                });
            }
        }

        let continuation = if resp.is_truncated == Some(true) {
            resp.next_continuation_token
        } else {
            None
        };

        Ok(Page {
            prefix: prefix.to_string(),
            entries,
            continuation,
        })
    }
}

/// Classify a listing failure into the error taxonomy.
fn classify_list_error<E: std::fmt::Display>(error: &E) -> SweepError {
    let text = format!("ListObjectsV2 failed: {error}");
    let lower = text.to_lowercase();

    if lower.contains("accessdenied")
        || lower.contains("invalidaccesskeyid")
        || lower.contains("signaturedoesnotmatch")
        || lower.contains("expiredtoken")
        || lower.contains("invalidtoken")
        || lower.contains("403")
    {
        SweepError::Auth(text)
    } else if lower.contains("timeout")
        || lower.contains("timed out")
        || lower.contains("dispatch failure")
        || lower.contains("connection")
        || lower.contains("dns error")
    {
        SweepError::Transport(text)
    } else {
        SweepError::Store(text)
    }
}
