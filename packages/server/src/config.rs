use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_days: i64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Filesystem,
    S3,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FilesystemStorageConfig {
    pub base_path: String,
    /// Base URL that uploaded blobs are served from.
    pub public_base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct S3StorageConfig {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO etc.).
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub public_base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub max_blob_size: u64,
    /// Lifetime of presigned streaming URLs.
    pub url_expiry_minutes: u64,
    pub filesystem: FilesystemStorageConfig,
    pub s3: Option<S3StorageConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", vec!["*".to_string()])?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.token_ttl_days", 7)?
            .set_default("storage.backend", "filesystem")?
            .set_default("storage.max_blob_size", 256 * 1024 * 1024_i64)?
            .set_default("storage.url_expiry_minutes", 60)?
            .set_default("storage.filesystem.base_path", "./data/videos")?
            .set_default(
                "storage.filesystem.public_base_url",
                "http://127.0.0.1:3000/media",
            )?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., SKILLET__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("SKILLET").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
