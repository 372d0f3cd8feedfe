//! Dominio domain - reference records served through a read-through cache

mod entity;
mod repository;

pub use entity::{Dominio, DominioCodigo, DominioValor, ValorDominio};
pub use repository::{DominioRepository, DominioStore};

#[cfg(test)]
pub use repository::MockDominioStore;
