//! In-memory storage implementation

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::storage::{Storage, StorageEntity, StorageKey};
use crate::domain::DomainError;

/// Thread-safe in-memory storage
///
/// Keeps entities in insertion order so `list` behaves like the Postgres backend.
/// Data is lost when the process terminates.
#[derive(Debug)]
pub struct InMemoryStorage<E>
where
    E: StorageEntity,
{
    entities: RwLock<Vec<E>>,
}

impl<E> Default for InMemoryStorage<E>
where
    E: StorageEntity,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryStorage<E>
where
    E: StorageEntity,
{
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(Vec::new()),
        }
    }

    /// Creates storage pre-populated with entities; later duplicates replace earlier ones
    pub fn with_entities(entities: Vec<E>) -> Self {
        let mut stored: Vec<E> = Vec::with_capacity(entities.len());

        for entity in entities {
            match stored.iter().position(|e| e.key() == entity.key()) {
                Some(index) => stored[index] = entity,
                None => stored.push(entity),
            }
        }

        Self {
            entities: RwLock::new(stored),
        }
    }

    fn position(entities: &[E], key: &E::Key) -> Option<usize> {
        entities.iter().position(|e| e.key() == *key)
    }
}

fn read_lock_error(e: impl std::fmt::Display) -> DomainError {
    DomainError::storage(format!("Failed to acquire read lock: {}", e))
}

fn write_lock_error(e: impl std::fmt::Display) -> DomainError {
    DomainError::storage(format!("Failed to acquire write lock: {}", e))
}

#[async_trait]
impl<E> Storage<E> for InMemoryStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let entities = self.entities.read().map_err(read_lock_error)?;

        Ok(Self::position(&entities, key).map(|i| entities[i].clone()))
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        let entities = self.entities.read().map_err(read_lock_error)?;

        Ok(entities.clone())
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key();
        let mut entities = self.entities.write().map_err(write_lock_error)?;

        if Self::position(&entities, &key).is_some() {
            return Err(DomainError::conflict(format!(
                "Entity with key '{}' already exists",
                key.as_str()
            )));
        }

        entities.push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key();
        let mut entities = self.entities.write().map_err(write_lock_error)?;

        let index = Self::position(&entities, &key).ok_or_else(|| {
            DomainError::not_found(format!("Entity with key '{}' not found", key.as_str()))
        })?;

        entities[index] = entity.clone();
        Ok(entity)
    }

    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
        let mut entities = self.entities.write().map_err(write_lock_error)?;

        match Self::position(&entities, key) {
            Some(index) => {
                entities.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let entities = self.entities.read().map_err(read_lock_error)?;

        Ok(entities.len())
    }
}
