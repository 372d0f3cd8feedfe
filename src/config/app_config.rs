use std::time::Duration;

use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::cache::{CacheConfig, CacheType, InMemoryCacheConfig, RedisCacheConfig};
use crate::infrastructure::storage::{PostgresConfig, StorageConfig, StorageType};
use crate::infrastructure::transfer::{S3TransferConfig, UploadGatewayConfig, DEFAULT_CONCURRENCY};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub cache: CacheSettings,
    pub storage: StorageSettings,
    pub object_store: ObjectStoreSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// `in_memory` or `redis`
    pub backend: String,
    pub redis_url: Option<String>,
    pub key_prefix: Option<String>,
    pub ttl_secs: u64,
    pub max_capacity: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `in_memory` or `postgres`
    pub backend: String,
    pub database_url: Option<String>,
    pub table: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObjectStoreSettings {
    pub bucket: String,
    pub region: Option<String>,
    /// S3-compatible endpoint, e.g. a local MinIO
    pub endpoint: Option<String>,
    pub key_prefix: Option<String>,
    pub part_size_mb: u64,
    pub concurrency: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: "in_memory".to_string(),
            redis_url: None,
            key_prefix: None,
            ttl_secs: 3600,
            max_capacity: 10_000,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: "in_memory".to_string(),
            database_url: None,
            table: "dominios".to_string(),
        }
    }
}

impl Default for ObjectStoreSettings {
    fn default() -> Self {
        Self {
            bucket: "extratos".to_string(),
            region: None,
            endpoint: None,
            key_prefix: None,
            part_size_mb: 8,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn to_cache_config(&self) -> Result<CacheConfig, DomainError> {
        match self.backend.parse::<CacheType>()? {
            CacheType::InMemory => {
                let defaults = InMemoryCacheConfig::default();
                let max_ttl = defaults.max_ttl.max(self.ttl());

                Ok(CacheConfig::InMemory(
                    defaults
                        .with_max_capacity(self.max_capacity)
                        .with_max_ttl(max_ttl),
                ))
            }
            CacheType::Redis => {
                let url = self.redis_url.clone().ok_or_else(|| {
                    DomainError::configuration("cache.redis_url is required for the redis backend")
                })?;

                let mut redis = RedisCacheConfig::new(url);
                if let Some(prefix) = &self.key_prefix {
                    redis = redis.with_key_prefix(prefix.clone());
                }

                Ok(CacheConfig::Redis(redis))
            }
        }
    }
}

impl StorageSettings {
    pub fn to_storage_config(&self) -> Result<StorageConfig, DomainError> {
        match self.backend.parse::<StorageType>()? {
            StorageType::InMemory => Ok(StorageConfig::in_memory()),
            StorageType::Postgres => {
                let url = self.database_url.clone().ok_or_else(|| {
                    DomainError::configuration(
                        "storage.database_url is required for the postgres backend",
                    )
                })?;
                Ok(StorageConfig::Postgres(PostgresConfig::new(url)))
            }
        }
    }
}

impl ObjectStoreSettings {
    pub fn to_gateway_config(&self) -> Result<UploadGatewayConfig, DomainError> {
        if self.bucket.trim().is_empty() {
            return Err(DomainError::configuration("object_store.bucket must not be empty"));
        }

        let config = UploadGatewayConfig::new(self.bucket.clone())
            .with_part_size(self.part_size_mb * 1024 * 1024)
            .with_concurrency(self.concurrency.max(1));

        Ok(match &self.key_prefix {
            Some(prefix) => config.with_key_prefix(prefix.clone()),
            None => config,
        })
    }

    pub fn to_s3_config(&self) -> S3TransferConfig {
        S3TransferConfig {
            region: self.region.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}
