//! Upload failure taxonomy

use thiserror::Error;

use crate::domain::error::BoxError;

/// Classification of a failed transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The storage provider rejected the request or could not be reached
    Provider,
    /// Any other fault: local I/O, invalid input, cancellation
    Generic,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Provider => write!(f, "provider"),
            FailureKind::Generic => write!(f, "generic"),
        }
    }
}

/// Errors raised while transferring a file to object storage
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Storage provider error: {message}")]
    Provider {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Transfer error: {message}")]
    Generic {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl TransferError {
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }

    pub fn provider_with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Provider {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
            source: None,
        }
    }

    pub fn generic_with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Generic {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn cancelled() -> Self {
        Self::generic("transfer cancelled")
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Provider { .. } => FailureKind::Provider,
            Self::Generic { .. } => FailureKind::Generic,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Provider { message, .. } | Self::Generic { message, .. } => message,
        }
    }
}

impl From<std::io::Error> for TransferError {
    fn from(err: std::io::Error) -> Self {
        Self::generic_with_source(format!("I/O error: {}", err), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_kind_classification() {
        assert_eq!(TransferError::provider("denied").kind(), FailureKind::Provider);
        assert_eq!(TransferError::generic("boom").kind(), FailureKind::Generic);
        assert_eq!(TransferError::cancelled().kind(), FailureKind::Generic);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            TransferError::provider("AccessDenied").to_string(),
            "Storage provider error: AccessDenied"
        );
        assert_eq!(
            TransferError::generic("disk unplugged").to_string(),
            "Transfer error: disk unplugged"
        );
    }

    #[test]
    fn test_io_error_is_generic_with_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no access");
        let err = TransferError::from(io);

        assert_eq!(err.kind(), FailureKind::Generic);
        assert!(err.source().is_some());
        assert!(err.message().contains("no access"));
    }
}
