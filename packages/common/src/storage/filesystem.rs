use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::traits::BlobStore;

/// Filesystem-backed blob store for local development.
///
/// Uploads land as flat files under `base_path`. Writes go through a
/// temp file and a rename so a crashed upload never leaves a partial
/// blob under its final name. Download URLs are unsigned joins against
/// the configured public base URL.
pub struct FilesystemBlobStore {
    base_path: PathBuf,
    public_base_url: String,
    max_size: u64,
}

impl FilesystemBlobStore {
    /// Create a new filesystem blob store rooted at `base_path`.
    pub async fn new(
        base_path: PathBuf,
        public_base_url: String,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            max_size,
        })
    }

    fn blob_path(&self, name: &str) -> Result<PathBuf, StorageError> {
        Ok(self.base_path.join(validate_name(name)?))
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }

    fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.public_base_url, name)
    }
}

/// Reject names that could escape the storage directory.
fn validate_name(name: &str) -> Result<&str, StorageError> {
    if name.is_empty() {
        return Err(StorageError::InvalidName("name is empty".into()));
    }
    if name.chars().any(|c| c.is_ascii_control()) {
        return Err(StorageError::InvalidName(
            "control characters are not allowed".into(),
        ));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(StorageError::InvalidName(
            "path separators are not allowed".into(),
        ));
    }
    if name.starts_with('.') {
        return Err(StorageError::InvalidName(
            "names must not start with '.'".into(),
        ));
    }
    Ok(name)
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn put(
        &self,
        name: &str,
        data: &[u8],
        _content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let blob_path = self.blob_path(name)?;

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, &blob_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(self.url_for(name))
    }

    async fn get(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.blob_path(name)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        Ok(fs::try_exists(self.blob_path(name)?).await?)
    }

    async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        match fs::remove_file(self.blob_path(name)?).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn download_url(
        &self,
        name: &str,
        _expires_in: Duration,
    ) -> Result<String, StorageError> {
        Ok(self.url_for(validate_name(name)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store(max_size: u64) -> (tempfile::TempDir, FilesystemBlobStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemBlobStore::new(
            dir.path().to_path_buf(),
            "http://localhost:3000/media/".into(),
            max_size,
        )
        .await
        .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let (_dir, store) = store(1024).await;

        let url = store.put("clip.mp4", b"frames", None).await.unwrap();

        assert_eq!(url, "http://localhost:3000/media/clip.mp4");
        assert_eq!(store.get("clip.mp4").await.unwrap(), b"frames");
        assert!(store.exists("clip.mp4").await.unwrap());
    }

    #[tokio::test]
    async fn missing_blob_is_not_found() {
        let (_dir, store) = store(1024).await;

        assert!(matches!(
            store.get("absent.mp4").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(!store.exists("absent.mp4").await.unwrap());
    }

    #[tokio::test]
    async fn rejects_blob_over_size_limit() {
        let (_dir, store) = store(4).await;

        assert!(matches!(
            store.put("big.mp4", b"too large", None).await,
            Err(StorageError::SizeLimitExceeded { actual: 9, limit: 4 })
        ));
    }

    #[tokio::test]
    async fn rejects_names_that_escape_the_directory() {
        let (_dir, store) = store(1024).await;

        for name in ["../escape", "a/b", "a\\b", ".hidden", "", "bad\nname"] {
            assert!(
                matches!(
                    store.put(name, b"x", None).await,
                    Err(StorageError::InvalidName(_))
                ),
                "accepted {name:?}"
            );
        }
    }

    #[tokio::test]
    async fn delete_reports_whether_the_blob_existed() {
        let (_dir, store) = store(1024).await;
        store.put("clip.mp4", b"frames", None).await.unwrap();

        assert!(store.delete("clip.mp4").await.unwrap());
        assert!(!store.delete("clip.mp4").await.unwrap());
    }

    #[tokio::test]
    async fn download_url_joins_the_public_base() {
        let (_dir, store) = store(1024).await;

        let url = store
            .download_url("clip.mp4", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:3000/media/clip.mp4");
    }
}
