//! Error types for the ingestion crate.

use spectrum::SpectrumError;
use storage::StorageError;
use thiserror::Error;

/// Errors that can occur while processing a notification.
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Invalid event document: {0}")]
    InvalidEvent(#[from] serde_json::Error),

    #[error("Malformed notification record: {0}")]
    MalformedRecord(String),

    #[error("Failed to prepare workspace: {0}")]
    Workspace(#[source] std::io::Error),

    #[error("Failed to download {bucket}/{key}: {source}")]
    Download {
        bucket: String,
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("Failed to transform image: {0}")]
    Transform(#[from] SpectrumError),

    #[error("Transform task failed: {0}")]
    TransformTask(String),

    #[error("Failed to upload {bucket}/{key}: {source}")]
    Upload {
        bucket: String,
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("Processing panicked: {0}")]
    Panicked(String),
}

impl IngestionError {
    /// Short machine-readable category.
    pub fn kind(&self) -> &'static str {
        match self {
            IngestionError::InvalidEvent(_) | IngestionError::MalformedRecord(_) => "structural",
            IngestionError::Download { .. } | IngestionError::Upload { .. } => "transfer",
            IngestionError::Transform(_) | IngestionError::TransformTask(_) => "transform",
            IngestionError::Workspace(_) | IngestionError::Panicked(_) => "internal",
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestionError>;
