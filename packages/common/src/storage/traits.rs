use std::time::Duration;

use async_trait::async_trait;

use super::error::StorageError;

/// Write-once named blob storage for uploaded media.
///
/// Blobs are addressed by an opaque name chosen by the caller; the
/// store never inspects content. Implementations must be safe to share
/// across concurrent requests.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes under `name` and return the blob's canonical URL.
    async fn put(
        &self,
        name: &str,
        data: &[u8],
        content_type: Option<&str>,
    ) -> Result<String, StorageError>;

    /// Retrieve all bytes of a blob.
    async fn get(&self, name: &str) -> Result<Vec<u8>, StorageError>;

    /// Check whether a blob exists.
    async fn exists(&self, name: &str) -> Result<bool, StorageError>;

    /// Delete a blob.
    ///
    /// Returns `true` if the blob was deleted, `false` if it did not exist.
    async fn delete(&self, name: &str) -> Result<bool, StorageError>;

    /// Produce a time-limited download URL for a blob.
    async fn download_url(&self, name: &str, expires_in: Duration)
    -> Result<String, StorageError>;
}
