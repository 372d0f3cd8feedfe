//! Dominio store backed by the generic document storage

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::dominio::{Dominio, DominioCodigo, DominioStore, DominioValor};
use crate::domain::storage::Storage;
use crate::domain::DomainError;

/// Answers lookups from a `Storage<Dominio>` keyed by dominio code
#[derive(Debug, Clone)]
pub struct StorageDominioStore {
    storage: Arc<dyn Storage<Dominio>>,
}

impl StorageDominioStore {
    pub fn new(storage: Arc<dyn Storage<Dominio>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl DominioStore for StorageDominioStore {
    async fn find(&self, query: &DominioValor) -> Result<Option<Dominio>, DomainError> {
        let dominio = self
            .storage
            .get(&DominioCodigo::new(query.codigo_dominio))
            .await?;

        Ok(dominio.filter(|d| d.matches(query)))
    }
}
