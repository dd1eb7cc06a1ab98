use std::time::Duration;

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, Region};

use super::error::StorageError;
use super::traits::BlobStore;

/// S3-compatible blob store (AWS S3, MinIO, and friends).
///
/// Canonical blob URLs are joined against a configured public base so
/// the bucket can sit behind a CDN; download URLs are presigned GETs
/// signed with the bucket credentials.
pub struct S3BlobStore {
    bucket: Box<Bucket>,
    public_base_url: String,
    max_size: u64,
}

/// Connection settings for an S3-compatible bucket.
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for non-AWS stores. Implies path-style addressing.
    pub endpoint: Option<String>,
    /// Static credentials. When absent, the default provider chain
    /// (environment, profile) is used.
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub public_base_url: String,
}

impl S3BlobStore {
    pub fn new(settings: S3Settings, max_size: u64) -> Result<Self, StorageError> {
        let path_style = settings.endpoint.is_some();
        let region = match settings.endpoint {
            Some(endpoint) => Region::Custom {
                region: settings.region,
                endpoint,
            },
            None => Region::Custom {
                region: settings.region.clone(),
                endpoint: format!("https://s3.{}.amazonaws.com", settings.region),
            },
        };

        let credentials = match (settings.access_key, settings.secret_key) {
            (Some(access), Some(secret)) => {
                Credentials::new(Some(&access), Some(&secret), None, None, None)
            }
            _ => Credentials::default(),
        }
        .map_err(|e| StorageError::Backend(e.to_string()))?;

        let mut bucket = Bucket::new(&settings.bucket, region, credentials).map_err(backend)?;
        if path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self {
            bucket,
            public_base_url: settings.public_base_url.trim_end_matches('/').to_string(),
            max_size,
        })
    }

    fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.public_base_url, name)
    }
}

fn backend(err: S3Error) -> StorageError {
    StorageError::Backend(err.to_string())
}

fn is_missing(err: &S3Error) -> bool {
    matches!(err, S3Error::HttpFailWithBody(404, _))
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(
        &self,
        name: &str,
        data: &[u8],
        content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        match content_type {
            Some(content_type) => self
                .bucket
                .put_object_with_content_type(name, data, content_type)
                .await
                .map_err(backend)?,
            None => self.bucket.put_object(name, data).await.map_err(backend)?,
        };

        Ok(self.url_for(name))
    }

    async fn get(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        match self.bucket.get_object(name).await {
            Ok(response) if response.status_code() == 404 => {
                Err(StorageError::NotFound(name.to_string()))
            }
            Ok(response) => Ok(response.bytes().to_vec()),
            Err(e) if is_missing(&e) => Err(StorageError::NotFound(name.to_string())),
            Err(e) => Err(backend(e)),
        }
    }

    async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        match self.bucket.head_object(name).await {
            Ok((_, 404)) => Ok(false),
            Ok(_) => Ok(true),
            Err(e) if is_missing(&e) => Ok(false),
            Err(e) => Err(backend(e)),
        }
    }

    async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        match self.bucket.delete_object(name).await {
            Ok(_) => Ok(true),
            Err(e) if is_missing(&e) => Ok(false),
            Err(e) => Err(backend(e)),
        }
    }

    async fn download_url(
        &self,
        name: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        self.bucket
            .presign_get(name, expires_in.as_secs() as u32, None)
            .await
            .map_err(backend)
    }
}
