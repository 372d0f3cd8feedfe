//! Transfer logger emitting through `tracing`

use tracing::{error, info};

use crate::domain::transfer::{TransferError, TransferLogger};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTransferLogger;

impl TracingTransferLogger {
    pub fn new() -> Self {
        Self
    }
}

impl TransferLogger for TracingTransferLogger {
    fn info(&self, message: &str) {
        info!(target: "extrator::transfer", "{}", message);
    }

    fn error(&self, cause: &TransferError, message: &str) {
        error!(
            target: "extrator::transfer",
            kind = %cause.kind(),
            error = ?cause,
            "{}",
            message
        );
    }
}
