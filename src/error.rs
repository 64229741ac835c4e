//! Error kinds surfaced by the tool-facing operations.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by upload, download and the pass-through operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Caller input is malformed or violates a precondition. Never retried.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A head/get call reported that the object does not exist.
    #[error("object '{key}' does not exist in bucket '{bucket}'")]
    ObjectNotFound { bucket: String, key: String },
    /// The storage service or local filesystem I/O failed.
    #[error("{context}: {source}")]
    StorageOperationFailed {
        context: String,
        #[source]
        source: StorageError,
    },
}

impl GatewayError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn storage(context: impl Into<String>, source: StorageError) -> Self {
        Self::StorageOperationFailed {
            context: context.into(),
            source,
        }
    }

    /// Wrap a failure that happened while reading one specific object.
    /// Absence is reported as `ObjectNotFound`, everything else as a storage failure.
    pub fn object_access(
        bucket: &str,
        key: &str,
        context: impl Into<String>,
        source: StorageError,
    ) -> Self {
        match source {
            StorageError::NotFound => Self::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            },
            other => Self::storage(context, other),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
