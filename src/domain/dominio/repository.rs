//! Dominio lookup ports

use async_trait::async_trait;

use super::{Dominio, DominioValor};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Backing store queried on a cache miss
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DominioStore: Send + Sync + std::fmt::Debug {
    /// Returns the first record holding the dominio and value named by `query`
    async fn find(&self, query: &DominioValor) -> Result<Option<Dominio>, DomainError>;
}

/// Read access to Dominio records for callers
#[async_trait]
pub trait DominioRepository: Send + Sync + std::fmt::Debug {
    /// Resolves a lookup to its record, `None` when no record matches
    async fn resolve(&self, query: &DominioValor) -> Result<Option<Dominio>, DomainError>;
}
