use super::BlobStore;
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::time::Duration;

/// S3 (or S3-compatible) implementation of `BlobStore`
pub struct S3BlobStore {
    client: Client,
}

impl S3BlobStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the shared AWS config, optionally pointed at a
    /// custom endpoint with path-style addressing (MinIO, LocalStack).
    pub fn from_sdk_config(sdk_config: &aws_config::SdkConfig, endpoint_url: Option<&str>) -> Self {
        let mut builder = aws_sdk_s3::config::Builder::from(sdk_config);
        if let Some(endpoint) = endpoint_url {
            tracing::info!(endpoint = %endpoint, "Using custom S3 endpoint");
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        Self::new(Client::from_conf(builder.build()))
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    fn scheme(&self) -> &'static str {
        "s3"
    }

    async fn put(&self, bucket: &str, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), String> {
        let start_time = std::time::Instant::now();
        let size = data.len();

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| format!("S3 put_object failed for {}/{}: {}", bucket, key, DisplayErrorContext(&e)))?;

        tracing::debug!(
            bucket = %bucket,
            key = %key,
            size = size,
            latency_ms = start_time.elapsed().as_millis(),
            "S3 object uploaded"
        );

        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, String> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| format!("S3 get_object failed for {}/{}: {}", bucket, key, DisplayErrorContext(&e)))?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| format!("Failed to read S3 object body for {}/{}: {}", bucket, key, e))?
            .into_bytes();

        Ok(bytes.to_vec())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), String> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| format!("S3 delete_object failed for {}/{}: {}", bucket, key, DisplayErrorContext(&e)))?;

        Ok(())
    }

    async fn signed_url(&self, bucket: &str, key: &str, ttl: Duration) -> Result<String, String> {
        let presigning = PresigningConfig::expires_in(ttl)
            .map_err(|e| format!("Invalid presigning TTL {:?}: {}", ttl, e))?;

        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| format!("Failed to presign {}/{}: {}", bucket, key, DisplayErrorContext(&e)))?;

        Ok(request.uri().to_string())
    }
}
