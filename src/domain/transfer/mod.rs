//! Transfer domain - uploads of local files to object storage

mod client;
mod error;
mod request;

pub use client::{ObjectStoreTransferClient, TransferLogger};
pub use error::{FailureKind, TransferError};
pub use request::{TransferReceipt, TransferRequest, UploadRequest};

#[cfg(test)]
pub use client::{MockObjectStoreTransferClient, MockTransferLogger};
