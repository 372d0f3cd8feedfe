//! Domain layer - Core entities, ports and errors

pub mod cache;
pub mod dominio;
pub mod error;
pub mod storage;
pub mod transfer;

pub use cache::{Cache, CacheExt, CacheKey};
pub use dominio::{
    Dominio, DominioCodigo, DominioRepository, DominioStore, DominioValor, ValorDominio,
};
pub use error::{BoxError, DomainError};
pub use storage::{Storage, StorageEntity, StorageKey};
pub use transfer::{
    FailureKind, ObjectStoreTransferClient, TransferError, TransferLogger, TransferReceipt,
    TransferRequest, UploadRequest,
};
