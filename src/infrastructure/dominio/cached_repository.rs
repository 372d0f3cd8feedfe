//! Read-through cached Dominio repository

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::domain::cache::{Cache, CacheExt};
use crate::domain::dominio::{Dominio, DominioRepository, DominioStore, DominioValor};
use crate::domain::DomainError;

/// Configuration for Dominio caching
#[derive(Debug, Clone)]
pub struct DominioCacheConfig {
    /// Optional `namespace:` prefix for cache keys; empty keeps the bare query JSON
    pub namespace: String,
    /// TTL handed to the cache for populated entries
    pub ttl: Duration,
}

impl Default for DominioCacheConfig {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            ttl: Duration::from_secs(3600),
        }
    }
}

impl DominioCacheConfig {
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Cache-aside repository over a [`DominioStore`]
///
/// The cache is only written with records the store returned; misses are not
/// cached. Cache and store failures are returned unchanged. Concurrent misses on
/// the same key may each hit the store and each write the cache.
#[derive(Debug, Clone)]
pub struct CachedDominioRepository {
    store: Arc<dyn DominioStore>,
    cache: Arc<dyn Cache>,
    config: DominioCacheConfig,
}

impl CachedDominioRepository {
    pub fn new(store: Arc<dyn DominioStore>, cache: Arc<dyn Cache>) -> Self {
        Self::with_config(store, cache, DominioCacheConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn DominioStore>,
        cache: Arc<dyn Cache>,
        config: DominioCacheConfig,
    ) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }
}

#[async_trait]
impl DominioRepository for CachedDominioRepository {
    #[instrument(
        skip(self, query),
        fields(codigo_dominio = query.codigo_dominio, codigo_valor = query.codigo_valor)
    )]
    async fn resolve(&self, query: &DominioValor) -> Result<Option<Dominio>, DomainError> {
        let key = query.cache_key(&self.config.namespace)?;

        let cached: Option<Dominio> = self.cache.get(key.as_str()).await?;

        if let Some(dominio) = cached {
            debug!(key = %key, "Dominio served from cache");
            return Ok(Some(dominio));
        }

        match self.store.find(query).await? {
            Some(dominio) => {
                self.cache.set(key.as_str(), &dominio, self.config.ttl).await?;
                debug!(key = %key, "Dominio loaded from store and cached");
                Ok(Some(dominio))
            }
            None => {
                debug!(key = %key, "Dominio not found");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::MockCache;
    use crate::domain::dominio::MockDominioStore;
    use crate::domain::ValorDominio;
    use crate::infrastructure::cache::InMemoryCache;
    use crate::infrastructure::dominio::StorageDominioStore;
    use crate::infrastructure::storage::InMemoryStorage;

    fn dominio(codigo: i32) -> Dominio {
        Dominio::new(codigo, format!("Dominio {}", codigo))
            .with_valor(ValorDominio::new(1, "Primeiro"))
    }

    fn key_for(query: &DominioValor) -> String {
        serde_json::to_string(query).unwrap()
    }

    fn storage_backed_store() -> Arc<dyn DominioStore> {
        let storage = InMemoryStorage::with_entities(vec![dominio(1)]);
        Arc::new(StorageDominioStore::new(Arc::new(storage)))
    }

    #[tokio::test]
    async fn test_resolve_returns_cached_value_without_store() {
        let query = DominioValor::new(1, 1);
        let expected_key = key_for(&query);
        let cached_json = serde_json::to_string(&dominio(1)).unwrap();

        let mut cache = MockCache::new();
        cache
            .expect_get_raw()
            .withf(move |key| key == expected_key)
            .times(1)
            .returning(move |_| Ok(Some(cached_json.clone())));
        cache.expect_set_raw().never();

        let mut store = MockDominioStore::new();
        store.expect_find().never();

        let repository = CachedDominioRepository::new(Arc::new(store), Arc::new(cache));
        let result = repository.resolve(&query).await.unwrap();

        assert_eq!(result, Some(dominio(1)));
    }

    #[tokio::test]
    async fn test_default_key_is_bare_query_json() {
        let mut cache = MockCache::new();
        cache
            .expect_get_raw()
            .withf(|key| key == r#"{"codigo_dominio":1,"codigo_valor":1}"#)
            .times(1)
            .returning(|_| Ok(None));
        cache.expect_set_raw().never();

        let mut store = MockDominioStore::new();
        store.expect_find().returning(|_| Ok(None));

        let repository = CachedDominioRepository::new(Arc::new(store), Arc::new(cache));

        assert!(repository.resolve(&DominioValor::new(1, 1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_store_and_populates_cache() {
        let query = DominioValor::new(1, 1);
        let expected_key = key_for(&query);
        let expected_json = serde_json::to_string(&dominio(1)).unwrap();

        let mut cache = MockCache::new();
        cache.expect_get_raw().times(1).returning(|_| Ok(None));
        cache
            .expect_set_raw()
            .withf(move |key, value, ttl| {
                key == expected_key && value == expected_json && *ttl == Duration::from_secs(3600)
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut store = MockDominioStore::new();
        store
            .expect_find()
            .withf(|q| *q == DominioValor::new(1, 1))
            .times(1)
            .returning(|_| Ok(Some(dominio(1))));

        let repository = CachedDominioRepository::new(Arc::new(store), Arc::new(cache));
        let result = repository.resolve(&query).await.unwrap();

        assert_eq!(result.map(|d| d.codigo), Some(1));
    }

    #[tokio::test]
    async fn test_resolve_miss_is_not_cached() {
        let mut cache = MockCache::new();
        cache.expect_get_raw().times(1).returning(|_| Ok(None));
        cache.expect_set_raw().never();

        let mut store = MockDominioStore::new();
        store.expect_find().times(1).returning(|_| Ok(None));

        let repository = CachedDominioRepository::new(Arc::new(store), Arc::new(cache));
        let result = repository.resolve(&DominioValor::new(2, 2)).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_resolve_storage_record_with_empty_cache() {
        let query = DominioValor::new(1, 1);
        let expected_key = key_for(&query);

        let mut cache = MockCache::new();
        cache
            .expect_get_raw()
            .withf(move |key| key == expected_key)
            .times(1)
            .returning(|_| Ok(None));
        cache.expect_set_raw().times(1).returning(|_, _, _| Ok(()));

        let repository = CachedDominioRepository::new(storage_backed_store(), Arc::new(cache));
        let result = repository.resolve(&query).await.unwrap();

        assert_eq!(result.unwrap().codigo, 1);
    }

    #[tokio::test]
    async fn test_resolve_unknown_lookup_with_empty_cache() {
        let query = DominioValor::new(2, 2);
        let expected_key = key_for(&query);

        let mut cache = MockCache::new();
        cache
            .expect_get_raw()
            .withf(move |key| key == expected_key)
            .times(1)
            .returning(|_| Ok(None));
        cache.expect_set_raw().never();

        let repository = CachedDominioRepository::new(storage_backed_store(), Arc::new(cache));

        assert!(repository.resolve(&query).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cache_error_propagates_without_store_call() {
        let mut cache = MockCache::new();
        cache
            .expect_get_raw()
            .returning(|_| Err(DomainError::cache("connection refused")));

        let mut store = MockDominioStore::new();
        store.expect_find().never();

        let repository = CachedDominioRepository::new(Arc::new(store), Arc::new(cache));
        let err = repository.resolve(&DominioValor::new(1, 1)).await.unwrap_err();

        assert_eq!(err.to_string(), "Cache error: connection refused");
    }

    #[tokio::test]
    async fn test_store_error_propagates_without_cache_write() {
        let mut cache = MockCache::new();
        cache.expect_get_raw().returning(|_| Ok(None));
        cache.expect_set_raw().never();

        let mut store = MockDominioStore::new();
        store
            .expect_find()
            .returning(|_| Err(DomainError::storage("pool timed out")));

        let repository = CachedDominioRepository::new(Arc::new(store), Arc::new(cache));
        let err = repository.resolve(&DominioValor::new(1, 1)).await.unwrap_err();

        assert!(matches!(err, DomainError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_cache_write_error_propagates() {
        let mut cache = MockCache::new();
        cache.expect_get_raw().returning(|_| Ok(None));
        cache
            .expect_set_raw()
            .times(1)
            .returning(|_, _, _| Err(DomainError::cache("read-only replica")));

        let mut store = MockDominioStore::new();
        store.expect_find().returning(|_| Ok(Some(dominio(1))));

        let repository = CachedDominioRepository::new(Arc::new(store), Arc::new(cache));
        let err = repository.resolve(&DominioValor::new(1, 1)).await.unwrap_err();

        assert!(matches!(err, DomainError::Cache { .. }));
    }

    #[tokio::test]
    async fn test_second_resolve_is_served_from_cache() {
        let mut store = MockDominioStore::new();
        store
            .expect_find()
            .times(1)
            .returning(|_| Ok(Some(dominio(1))));

        let repository =
            CachedDominioRepository::new(Arc::new(store), Arc::new(InMemoryCache::new()));
        let query = DominioValor::new(1, 1);

        let first = repository.resolve(&query).await.unwrap();
        let second = repository.resolve(&query).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_distinct_lookups_use_independent_entries() {
        let mut store = MockDominioStore::new();
        store
            .expect_find()
            .times(2)
            .returning(|q| {
                let record = Dominio::new(q.codigo_dominio, "Gerado")
                    .with_valor(ValorDominio::new(q.codigo_valor, "Gerado"));
                Ok(Some(record))
            });

        let repository =
            CachedDominioRepository::new(Arc::new(store), Arc::new(InMemoryCache::new()));

        let a = repository.resolve(&DominioValor::new(1, 1)).await.unwrap().unwrap();
        let b = repository.resolve(&DominioValor::new(2, 2)).await.unwrap().unwrap();

        assert_eq!(a.codigo, 1);
        assert_eq!(b.codigo, 2);
    }

    #[tokio::test]
    async fn test_custom_namespace_and_ttl() {
        let query = DominioValor::new(4, 1);
        let expected_key = query.cache_key("mdm").unwrap().to_string();

        let mut cache = MockCache::new();
        cache.expect_get_raw().returning(|_| Ok(None));
        cache
            .expect_set_raw()
            .withf(move |key, _, ttl| key == expected_key && *ttl == Duration::from_secs(90))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut store = MockDominioStore::new();
        store.expect_find().returning(|_| Ok(Some(dominio(4))));

        let config = DominioCacheConfig::default()
            .with_namespace("mdm")
            .with_ttl(Duration::from_secs(90));
        let repository =
            CachedDominioRepository::with_config(Arc::new(store), Arc::new(cache), config);

        assert!(repository.resolve(&query).await.unwrap().is_some());
    }
}
