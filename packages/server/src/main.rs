use std::net::SocketAddr;
use std::sync::Arc;

use common::storage::BlobStore;
use common::storage::filesystem::FilesystemBlobStore;
use common::storage::s3::{S3BlobStore, S3Settings};
use tracing::{Level, info};

use server::config::{AppConfig, StorageBackend};
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = server::database::init_db(&config.database.url).await?;
    server::seed::ensure_indexes(&db).await?;

    let blob_store: Arc<dyn BlobStore> = match config.storage.backend {
        StorageBackend::Filesystem => {
            let fs = &config.storage.filesystem;
            Arc::new(
                FilesystemBlobStore::new(
                    fs.base_path.clone().into(),
                    fs.public_base_url.clone(),
                    config.storage.max_blob_size,
                )
                .await?,
            )
        }
        StorageBackend::S3 => {
            let s3 = config.storage.s3.clone().ok_or_else(|| {
                anyhow::anyhow!("storage.backend = \"s3\" requires a [storage.s3] section")
            })?;
            Arc::new(S3BlobStore::new(
                S3Settings {
                    bucket: s3.bucket,
                    region: s3.region,
                    endpoint: s3.endpoint,
                    access_key: s3.access_key,
                    secret_key: s3.secret_key,
                    public_base_url: s3.public_base_url,
                },
                config.storage.max_blob_size,
            )?)
        }
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let state = AppState {
        db,
        blob_store,
        config: Arc::new(config),
    };

    let app = server::build_router(state);

    info!("Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
