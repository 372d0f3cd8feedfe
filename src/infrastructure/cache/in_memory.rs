//! Process-local cache on moka with per-entry expiry

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use moka::Expiry;

use crate::domain::cache::Cache;
use crate::domain::DomainError;

#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Entry count at which moka starts evicting
    pub max_capacity: u64,
    /// Ceiling applied to every requested TTL
    pub max_ttl: Duration,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            max_ttl: Duration::from_secs(24 * 3600),
        }
    }
}

impl InMemoryCacheConfig {
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }

    pub fn with_max_ttl(mut self, ttl: Duration) -> Self {
        self.max_ttl = ttl;
        self
    }
}

/// Serialized snapshot plus the lifetime it was stored with
#[derive(Debug, Clone)]
struct Snapshot {
    json: Arc<str>,
    ttl: Duration,
}

/// Expires each snapshot after its own TTL, capped by the configured ceiling
struct SnapshotExpiry {
    max_ttl: Duration,
}

impl Expiry<String, Snapshot> for SnapshotExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Snapshot,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl.min(self.max_ttl))
    }

    // Overwrites restart the clock
    fn expire_after_update(
        &self,
        _key: &String,
        value: &Snapshot,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl.min(self.max_ttl))
    }
}

/// Thread-safe in-memory cache
///
/// Values are kept as JSON text, so every read hands out a fresh copy.
#[derive(Debug, Clone)]
pub struct InMemoryCache {
    entries: MokaCache<String, Snapshot>,
    config: InMemoryCacheConfig,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        let entries = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(SnapshotExpiry {
                max_ttl: config.max_ttl,
            })
            .build();

        Self { entries, config }
    }

    pub fn config(&self) -> &InMemoryCacheConfig {
        &self.config
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self
            .entries
            .get(key)
            .await
            .map(|snapshot| snapshot.json.to_string()))
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let snapshot = Snapshot {
            json: Arc::from(value),
            ttl,
        };

        self.entries.insert(key.to_string(), snapshot).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.entries.remove(key).await.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::CacheExt;
    use crate::domain::{Dominio, ValorDominio};

    const MINUTE: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_raw_values_round_trip() {
        let cache = InMemoryCache::new();

        cache.set_raw("k", r#"{"a":1}"#, MINUTE).await.unwrap();

        assert_eq!(cache.get_raw("k").await.unwrap().as_deref(), Some(r#"{"a":1}"#));
        assert!(cache.get_raw("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_reports_presence() {
        let cache = InMemoryCache::new();
        cache.set_raw("k", "1", MINUTE).await.unwrap();

        assert!(cache.exists("k").await.unwrap());
        assert!(cache.delete("k").await.unwrap());
        assert!(!cache.delete("k").await.unwrap());
        assert!(!cache.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_entry_expires_after_its_ttl() {
        let cache = InMemoryCache::new();

        cache
            .set_raw("short", "1", Duration::from_millis(50))
            .await
            .unwrap();
        cache.set_raw("long", "2", MINUTE).await.unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(cache.get_raw("short").await.unwrap().is_none());
        assert!(cache.get_raw("long").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_ttl_is_capped_by_config() {
        let cache = InMemoryCache::with_config(
            InMemoryCacheConfig::default().with_max_ttl(Duration::from_millis(50)),
        );

        cache.set_raw("k", "1", MINUTE).await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(cache.get_raw("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let cache = InMemoryCache::new();

        cache.set_raw("k", "old", MINUTE).await.unwrap();
        cache.set_raw("k", "new", MINUTE).await.unwrap();

        assert_eq!(cache.get_raw("k").await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_reads_are_independent_copies() {
        let cache = InMemoryCache::new();
        let dominio =
            Dominio::new(1, "Tipo de conta").with_valor(ValorDominio::new(1, "Corrente"));

        cache.set("dominio:1", &dominio, MINUTE).await.unwrap();

        let mut first: Dominio = cache.get("dominio:1").await.unwrap().unwrap();
        first.nome.push_str(" (editado)");

        let second: Dominio = cache.get("dominio:1").await.unwrap().unwrap();
        assert_eq!(second, dominio);
    }

    #[test]
    fn test_config_builders() {
        let cache = InMemoryCache::with_config(
            InMemoryCacheConfig::default()
                .with_max_capacity(100)
                .with_max_ttl(Duration::from_secs(300)),
        );

        assert_eq!(cache.config().max_capacity, 100);
        assert_eq!(cache.config().max_ttl, Duration::from_secs(300));
    }
}
