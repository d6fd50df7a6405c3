use super::error::AudioError;
use super::format::{classify_format, is_canonical_wav};
use crate::infrastructure::storage::BlobStore;
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const WAV_CONTENT_TYPE: &str = "audio/wav";

/// Where a blob lives: reference samples or generated clips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioNamespace {
    Reference,
    Generated,
}

/// Parsed `<scheme>://<bucket>/<key>` path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalPath {
    pub scheme: String,
    pub bucket: String,
    pub key: String,
}

impl CanonicalPath {
    pub fn parse(path: &str) -> Result<Self, AudioError> {
        let invalid = || AudioError::InvalidPathFormat(path.to_string());

        let (scheme, rest) = path.split_once("://").ok_or_else(invalid)?;
        let (bucket, key) = rest.split_once('/').ok_or_else(invalid)?;

        if scheme.is_empty() || bucket.is_empty() || key.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            scheme: scheme.to_string(),
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, self.bucket, self.key)
    }
}

/// Persists canonical WAV buffers in one of two namespaces and resolves
/// canonical paths back to bytes.
pub struct AudioStorage {
    blob_store: Arc<dyn BlobStore>,
    reference_bucket: String,
    generated_bucket: String,
}

impl AudioStorage {
    pub fn new(
        blob_store: Arc<dyn BlobStore>,
        reference_bucket: String,
        generated_bucket: String,
    ) -> Self {
        Self {
            blob_store,
            reference_bucket,
            generated_bucket,
        }
    }

    pub async fn store(&self, wav: Vec<u8>, namespace: AudioNamespace) -> Result<String, AudioError> {
        let (bucket, key) = match namespace {
            AudioNamespace::Reference => (&self.reference_bucket, reference_key()),
            AudioNamespace::Generated => (&self.generated_bucket, generated_key()),
        };
        let size = wav.len();

        self.blob_store
            .put(bucket, &key, wav, WAV_CONTENT_TYPE)
            .await
            .map_err(AudioError::Storage)?;

        let path = CanonicalPath {
            scheme: self.blob_store.scheme().to_string(),
            bucket: bucket.clone(),
            key,
        };

        tracing::info!(path = %path, size = size, "Audio stored");

        Ok(path.to_string())
    }

    pub async fn retrieve(&self, path: &str) -> Result<Vec<u8>, AudioError> {
        let resolved = self.resolve(path)?;

        let buffer = self
            .blob_store
            .get(&resolved.bucket, &resolved.key)
            .await
            .map_err(AudioError::Storage)?;

        if !is_canonical_wav(&buffer) {
            tracing::warn!(
                path = %path,
                format = %classify_format(&buffer),
                size = buffer.len(),
                "Stored audio is not canonical WAV"
            );
        }

        Ok(buffer)
    }

    pub async fn delete(&self, path: &str) -> Result<(), AudioError> {
        let resolved = self.resolve(path)?;

        self.blob_store
            .delete(&resolved.bucket, &resolved.key)
            .await
            .map_err(AudioError::Storage)?;

        tracing::info!(path = %path, "Audio deleted");

        Ok(())
    }

    /// Presigned GET URL for direct playback
    pub async fn signed_url(&self, path: &str, ttl: Duration) -> Result<String, AudioError> {
        let resolved = self.resolve(path)?;

        self.blob_store
            .signed_url(&resolved.bucket, &resolved.key, ttl)
            .await
            .map_err(AudioError::Storage)
    }

    /// Parse a canonical path and check that it belongs to this backend
    fn resolve(&self, path: &str) -> Result<CanonicalPath, AudioError> {
        let parsed = CanonicalPath::parse(path)?;

        if parsed.scheme != self.blob_store.scheme() {
            return Err(AudioError::InvalidPathFormat(path.to_string()));
        }
        if parsed.bucket != self.reference_bucket && parsed.bucket != self.generated_bucket {
            return Err(AudioError::InvalidPathFormat(path.to_string()));
        }

        Ok(parsed)
    }
}

fn reference_key() -> String {
    format!("{}.wav", Uuid::new_v4())
}

fn generated_key() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{}_{}.wav", Utc::now().timestamp_millis(), &random[..12])
}
