//! Redis-backed cache shared between processes

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError};

use crate::domain::cache::Cache;
use crate::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisCacheConfig {
    /// Connection URL, e.g. `redis://127.0.0.1:6379`
    pub url: String,
    /// Namespace joined to every key with `:`
    pub key_prefix: Option<String>,
}

impl RedisCacheConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key_prefix: None,
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Full Redis key for a cache key
    pub fn redis_key(&self, key: &str) -> String {
        match self.key_prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, key),
            _ => key.to_string(),
        }
    }
}

fn redis_error(action: &str, key: &str, err: RedisError) -> DomainError {
    DomainError::cache_with_source(format!("Failed to {} key '{}'", action, key), err)
}

/// `PX` takes whole milliseconds and rejects zero
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    config: RedisCacheConfig,
}

impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RedisCache {
    /// Opens a managed connection that reconnects on failure
    pub async fn connect(config: RedisCacheConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::cache_with_source("Invalid Redis URL", e))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::cache_with_source("Failed to connect to Redis", e))?;

        Ok(Self { connection, config })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        let mut conn = self.connection.clone();

        conn.get(self.config.redis_key(key))
            .await
            .map_err(|e| redis_error("get", key, e))
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        let _: () = redis::cmd("SET")
            .arg(self.config.redis_key(key))
            .arg(value)
            .arg("PX")
            .arg(ttl_millis(ttl))
            .query_async(&mut conn)
            .await
            .map_err(|e| redis_error("set", key, e))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let mut conn = self.connection.clone();

        let removed: u64 = conn
            .del(self.config.redis_key(key))
            .await
            .map_err(|e| redis_error("delete", key, e))?;

        Ok(removed > 0)
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        let mut conn = self.connection.clone();

        conn.exists(self.config.redis_key(key))
            .await
            .map_err(|e| redis_error("check", key, e))
    }
}
