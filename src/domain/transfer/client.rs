//! Object store transfer ports

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{TransferError, TransferReceipt, TransferRequest};

#[cfg(test)]
use mockall::automock;

/// Client able to push a local file to an object store in parts
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectStoreTransferClient: Send + Sync + std::fmt::Debug {
    /// Uploads the file described by `request`
    ///
    /// Cancelling `cancel` aborts the transfer and surfaces as an error.
    async fn upload(
        &self,
        request: &TransferRequest,
        cancel: CancellationToken,
    ) -> Result<TransferReceipt, TransferError>;
}

/// Sink for operator-facing transfer signals
#[cfg_attr(test, automock)]
pub trait TransferLogger: Send + Sync + std::fmt::Debug {
    fn info(&self, message: &str);

    fn error(&self, cause: &TransferError, message: &str);
}
