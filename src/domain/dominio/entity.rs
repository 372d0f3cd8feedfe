//! Dominio reference records and lookup keys

use serde::{Deserialize, Serialize};

use crate::domain::cache::CacheKey;
use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::DomainError;

/// Storage key of a [`Dominio`], the decimal form of its code
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DominioCodigo(String);

impl DominioCodigo {
    pub fn new(codigo: i32) -> Self {
        Self(codigo.to_string())
    }
}

impl StorageKey for DominioCodigo {
    fn as_str(&self) -> &str {
        &self.0
    }
}

/// A single value inside a Dominio
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValorDominio {
    pub codigo: i32,
    pub descricao: String,
}

impl ValorDominio {
    pub fn new(codigo: i32, descricao: impl Into<String>) -> Self {
        Self {
            codigo,
            descricao: descricao.into(),
        }
    }
}

/// Reference record grouping the values of one business domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dominio {
    pub codigo: i32,
    pub nome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(default)]
    pub valores: Vec<ValorDominio>,
}

impl Dominio {
    pub fn new(codigo: i32, nome: impl Into<String>) -> Self {
        Self {
            codigo,
            nome: nome.into(),
            descricao: None,
            valores: Vec::new(),
        }
    }

    pub fn with_valor(mut self, valor: ValorDominio) -> Self {
        self.valores.push(valor);
        self
    }

    /// Returns the value with the given code, if present
    pub fn valor(&self, codigo: i32) -> Option<&ValorDominio> {
        self.valores.iter().find(|v| v.codigo == codigo)
    }

    /// True when this record holds the dominio and value named by `query`
    pub fn matches(&self, query: &DominioValor) -> bool {
        self.codigo == query.codigo_dominio && self.valor(query.codigo_valor).is_some()
    }
}

impl StorageEntity for Dominio {
    type Key = DominioCodigo;

    fn key(&self) -> Self::Key {
        DominioCodigo::new(self.codigo)
    }
}

/// Lookup key naming a value inside a dominio
///
/// Serializes canonically, so it doubles as the cache identity of a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DominioValor {
    pub codigo_dominio: i32,
    pub codigo_valor: i32,
}

impl DominioValor {
    pub fn new(codigo_dominio: i32, codigo_valor: i32) -> Self {
        Self {
            codigo_dominio,
            codigo_valor,
        }
    }

    /// Derives the cache key for this lookup under `namespace`
    pub fn cache_key(&self, namespace: &str) -> Result<CacheKey, DomainError> {
        CacheKey::derive_namespaced(namespace, self)
    }
}
