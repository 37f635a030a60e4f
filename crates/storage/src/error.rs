//! Error types for storage operations.

use thiserror::Error;

/// Result type alias using StorageError.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by object storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("Invalid object key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Local file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage configuration: {0}")]
    Config(String),
}
