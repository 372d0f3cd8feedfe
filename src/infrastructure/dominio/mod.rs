//! Dominio infrastructure - cached repository and store adapters

mod cached_repository;
mod storage_store;

pub use cached_repository::{CachedDominioRepository, DominioCacheConfig};
pub use storage_store::StorageDominioStore;
