//! Keys and documents for the storage port

use std::fmt::Debug;
use std::hash::Hash;

use serde::{de::DeserializeOwned, Serialize};

/// Identifier of a stored document, indexed by its string form
pub trait StorageKey: Clone + Debug + Eq + Hash + Send + Sync {
    fn as_str(&self) -> &str;
}

/// A document persisted as JSON under its own key
pub trait StorageEntity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync {
    type Key: StorageKey;

    fn key(&self) -> Self::Key;
}
