//! Upload requests and receipts

use std::path::PathBuf;

use super::TransferError;

/// A local file to be uploaded under a remote object name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub local_path: PathBuf,
    pub remote_name: String,
}

impl UploadRequest {
    pub fn new(local_path: impl Into<PathBuf>, remote_name: impl Into<String>) -> Self {
        Self {
            local_path: local_path.into(),
            remote_name: remote_name.into(),
        }
    }

    /// Checks that the request names a readable regular file and returns its size
    pub async fn validate(&self) -> Result<u64, TransferError> {
        if self.remote_name.trim().is_empty() {
            return Err(TransferError::generic("Remote object name must not be empty"));
        }

        let metadata = tokio::fs::metadata(&self.local_path).await.map_err(|e| {
            TransferError::generic_with_source(
                format!("Cannot access '{}': {}", self.local_path.display(), e),
                e,
            )
        })?;

        if !metadata.is_file() {
            return Err(TransferError::generic(format!(
                "'{}' is not a regular file",
                self.local_path.display()
            )));
        }

        tokio::fs::File::open(&self.local_path).await.map_err(|e| {
            TransferError::generic_with_source(
                format!("Cannot read '{}': {}", self.local_path.display(), e),
                e,
            )
        })?;

        Ok(metadata.len())
    }
}

/// A chunked upload submitted to an object store client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub source_path: PathBuf,
    pub bucket: String,
    pub key: String,
    pub content_length: u64,
    pub part_size: u64,
    pub concurrency: usize,
}

/// Result of a completed upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub bucket: String,
    pub key: String,
    pub bytes: u64,
    pub parts: usize,
    pub e_tag: Option<String>,
}
