//! Cache backend selection

use std::sync::Arc;

use crate::domain::cache::Cache;
use crate::domain::DomainError;

use super::in_memory::{InMemoryCache, InMemoryCacheConfig};
use super::redis::{RedisCache, RedisCacheConfig};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheType {
    #[default]
    InMemory,
    Redis,
}

impl std::fmt::Display for CacheType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::InMemory => "in_memory",
            Self::Redis => "redis",
        })
    }
}

impl std::str::FromStr for CacheType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "redis" => Ok(Self::Redis),
            _ => Err(DomainError::configuration(format!(
                "Unknown cache backend: {}. Valid backends: in_memory, redis",
                s
            ))),
        }
    }
}

/// Backend plus its settings
#[derive(Debug, Clone)]
pub enum CacheConfig {
    InMemory(InMemoryCacheConfig),
    Redis(RedisCacheConfig),
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::InMemory(InMemoryCacheConfig::default())
    }
}

impl CacheConfig {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn redis(url: impl Into<String>) -> Self {
        Self::Redis(RedisCacheConfig::new(url))
    }

    pub fn cache_type(&self) -> CacheType {
        match self {
            Self::InMemory(_) => CacheType::InMemory,
            Self::Redis(_) => CacheType::Redis,
        }
    }
}

#[derive(Debug)]
pub struct CacheFactory;

impl CacheFactory {
    /// Builds the configured cache; Redis connects eagerly
    pub async fn create(config: &CacheConfig) -> Result<Arc<dyn Cache>, DomainError> {
        match config {
            CacheConfig::InMemory(settings) => {
                Ok(Arc::new(InMemoryCache::with_config(settings.clone())))
            }
            CacheConfig::Redis(settings) => {
                Ok(Arc::new(RedisCache::connect(settings.clone()).await?))
            }
        }
    }
}
