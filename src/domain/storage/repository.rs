//! Document storage port

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

use super::entity::StorageEntity;

/// Keyed document store for one entity type
///
/// Backends differ only in durability; `list` order is backend-defined but stable.
#[async_trait]
pub trait Storage<E>: Send + Sync + Debug
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError>;

    async fn list(&self) -> Result<Vec<E>, DomainError>;

    /// Inserts a new document; `Conflict` when the key is taken
    async fn create(&self, entity: E) -> Result<E, DomainError>;

    /// Replaces an existing document; `NotFound` when the key is absent
    async fn update(&self, entity: E) -> Result<E, DomainError>;

    /// Upsert. Backends with a native upsert should override this.
    async fn save(&self, entity: E) -> Result<E, DomainError> {
        match self.get(&entity.key()).await? {
            Some(_) => self.update(entity).await,
            None => self.create(entity).await,
        }
    }

    /// Returns whether a document was removed
    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError>;

    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        self.get(key).await.map(|found| found.is_some())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        self.list().await.map(|all| all.len())
    }
}
