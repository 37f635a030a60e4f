//! Download/upload capability used by the ingestion pipeline.

use std::path::Path;

use async_trait::async_trait;

use crate::error::StorageResult;

/// Moves whole objects between a bucket and the local filesystem.
///
/// Implementations perform no retries; a failed call is reported once
/// and left to the caller.
#[async_trait]
pub trait ObjectTransfer: Send + Sync {
    /// Copy `bucket/key` into the file at `local_path`, replacing it.
    async fn download(&self, bucket: &str, key: &str, local_path: &Path) -> StorageResult<()>;

    /// Copy the file at `local_path` to `bucket/key`, replacing any existing object.
    async fn upload(&self, local_path: &Path, bucket: &str, key: &str) -> StorageResult<()>;
}
