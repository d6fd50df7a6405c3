use async_trait::async_trait;
use std::time::Duration;

/// Object storage addressed by bucket and key.
///
/// `scheme` is the prefix used in canonical paths (`<scheme>://<bucket>/<key>`)
/// so stored paths can be checked against the backend that wrote them.
#[async_trait]
pub trait BlobStore: Send + Sync {
    fn scheme(&self) -> &'static str;

    async fn put(&self, bucket: &str, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), String>;

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, String>;

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), String>;

    async fn signed_url(&self, bucket: &str, key: &str, ttl: Duration) -> Result<String, String>;
}
