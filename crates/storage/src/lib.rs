//! Storage abstractions for the fft-pipeline services.
//!
//! Provides:
//! - `ObjectTransfer`, the download/upload capability the ingestion
//!   pipeline depends on
//! - `ObjectStorage`, an `object_store` backed client for S3/MinIO,
//!   a local directory tree, or memory

pub mod error;
pub mod object_store;
pub mod transfer;

pub use self::object_store::{ObjectStorage, ObjectStorageConfig, StorageBackend};
pub use error::{StorageError, StorageResult};
pub use transfer::ObjectTransfer;
