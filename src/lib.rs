//! Extrator Gateway
//!
//! Data-access helpers for the statement extraction service:
//! - Read-through cached lookup of dominio (reference code) values
//! - Upload gateway pushing local files to S3-compatible object storage

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::{Dominio, DominioRepository, Storage};
use infrastructure::{
    cache::CacheFactory,
    dominio::{CachedDominioRepository, DominioCacheConfig, StorageDominioStore},
    storage::StorageFactory,
    transfer::{S3TransferClient, TracingTransferLogger, UploadGateway},
};
use tracing::info;

/// Create the dominio document storage selected by `storage.backend`
pub async fn create_dominio_storage(
    config: &AppConfig,
) -> anyhow::Result<Arc<dyn Storage<Dominio>>> {
    let storage_config = config.storage.to_storage_config()?;
    info!(
        backend = ?storage_config.storage_type(),
        table = %config.storage.table,
        "Creating dominio storage"
    );

    let storage = StorageFactory::create::<Dominio>(&storage_config, &config.storage.table).await?;
    Ok(storage)
}

/// Create the cached dominio repository from configuration
pub async fn create_dominio_repository(
    config: &AppConfig,
) -> anyhow::Result<Arc<dyn DominioRepository>> {
    let storage = create_dominio_storage(config).await?;
    create_dominio_repository_with_storage(config, storage).await
}

/// Create the cached dominio repository over an existing storage
pub async fn create_dominio_repository_with_storage(
    config: &AppConfig,
    storage: Arc<dyn Storage<Dominio>>,
) -> anyhow::Result<Arc<dyn DominioRepository>> {
    let cache_config = config.cache.to_cache_config()?;
    info!(backend = %cache_config.cache_type(), "Creating dominio cache");

    let cache = CacheFactory::create(&cache_config).await?;
    let store = Arc::new(StorageDominioStore::new(storage));
    let repository = CachedDominioRepository::with_config(
        store,
        cache,
        DominioCacheConfig::default().with_ttl(config.cache.ttl()),
    );

    Ok(Arc::new(repository))
}

/// Create the upload gateway backed by S3
pub async fn create_upload_gateway(config: &AppConfig) -> anyhow::Result<UploadGateway> {
    let gateway_config = config.object_store.to_gateway_config()?;
    let client = S3TransferClient::from_config(&config.object_store.to_s3_config()).await;

    info!(bucket = %gateway_config.bucket, "Upload gateway ready");

    Ok(UploadGateway::new(
        Arc::new(client),
        Arc::new(TracingTransferLogger::new()),
        gateway_config,
    ))
}
