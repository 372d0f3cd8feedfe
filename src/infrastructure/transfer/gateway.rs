//! Upload gateway - logs and classifies transfers to the object store

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::domain::transfer::{
    FailureKind, ObjectStoreTransferClient, TransferError, TransferLogger, TransferReceipt,
    TransferRequest, UploadRequest,
};

/// Default part size for multipart uploads (8 MiB)
pub const DEFAULT_PART_SIZE: u64 = 8 * 1024 * 1024;

/// Default number of parts in flight
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Destination settings for uploads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadGatewayConfig {
    pub bucket: String,
    /// Prepended to every remote name, e.g. `contas/`
    pub key_prefix: Option<String>,
    pub part_size: u64,
    pub concurrency: usize,
}

impl UploadGatewayConfig {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key_prefix: None,
            part_size: DEFAULT_PART_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn with_part_size(mut self, part_size: u64) -> Self {
        self.part_size = part_size;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Full object key for a remote name
    pub fn object_key(&self, remote_name: &str) -> String {
        match self.key_prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => format!("{}{}", prefix, remote_name),
            _ => remote_name.to_string(),
        }
    }
}

fn start_message(request: &UploadRequest) -> String {
    format!(
        "Starting transfer of file '{}' to object '{}'",
        request.local_path.display(),
        request.remote_name
    )
}

fn completion_message(request: &UploadRequest, receipt: &TransferReceipt) -> String {
    format!(
        "Transfer of file '{}' to object '{}' completed ({} bytes in {} parts)",
        request.local_path.display(),
        request.remote_name,
        receipt.bytes,
        receipt.parts
    )
}

fn failure_message(kind: FailureKind, request: &UploadRequest) -> String {
    match kind {
        FailureKind::Provider => format!(
            "An exception occurred in the connection to the storage provider while transferring '{}'",
            request.remote_name
        ),
        FailureKind::Generic => format!(
            "A generic exception occurred while transferring the file '{}' to the storage provider",
            request.remote_name
        ),
    }
}

/// Uploads local files, logging a start signal and at most one failure
///
/// Every call logs its start before any other work. A failed call logs exactly
/// one error whose text depends on the failure kind, then returns that same
/// error to the caller.
#[derive(Debug, Clone)]
pub struct UploadGateway {
    client: Arc<dyn ObjectStoreTransferClient>,
    logger: Arc<dyn TransferLogger>,
    config: UploadGatewayConfig,
}

impl UploadGateway {
    pub fn new(
        client: Arc<dyn ObjectStoreTransferClient>,
        logger: Arc<dyn TransferLogger>,
        config: UploadGatewayConfig,
    ) -> Self {
        Self {
            client,
            logger,
            config,
        }
    }

    /// Uploads `local_path` under `remote_name`
    pub async fn upload(
        &self,
        local_path: impl AsRef<Path>,
        remote_name: &str,
    ) -> Result<TransferReceipt, TransferError> {
        self.upload_with_cancellation(local_path, remote_name, CancellationToken::new())
            .await
    }

    /// Uploads `local_path` under `remote_name`, aborting when `cancel` fires
    #[instrument(skip_all, fields(remote_name = %remote_name))]
    pub async fn upload_with_cancellation(
        &self,
        local_path: impl AsRef<Path>,
        remote_name: &str,
        cancel: CancellationToken,
    ) -> Result<TransferReceipt, TransferError> {
        let request = UploadRequest::new(local_path.as_ref(), remote_name);
        self.logger.info(&start_message(&request));

        match self.transfer(&request, cancel).await {
            Ok(receipt) => {
                self.logger.info(&completion_message(&request, &receipt));
                Ok(receipt)
            }
            Err(err) => {
                self.logger.error(&err, &failure_message(err.kind(), &request));
                Err(err)
            }
        }
    }

    async fn transfer(
        &self,
        request: &UploadRequest,
        cancel: CancellationToken,
    ) -> Result<TransferReceipt, TransferError> {
        let content_length = request.validate().await?;

        let transfer = TransferRequest {
            source_path: request.local_path.clone(),
            bucket: self.config.bucket.clone(),
            key: self.config.object_key(&request.remote_name),
            content_length,
            part_size: self.config.part_size,
            concurrency: self.config.concurrency,
        };

        self.client.upload(&transfer, cancel).await
    }
}
