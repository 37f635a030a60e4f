//! Object storage client (S3/MinIO compatible, local directory, or memory).

use async_trait::async_trait;
use bytes::Bytes;
use object_store::{
    aws::AmazonS3Builder, local::LocalFileSystem, memory::InMemory, path::Path, ObjectStore,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path as LocalPath, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::error::{StorageError, StorageResult};
use crate::transfer::ObjectTransfer;

/// Configuration for an S3/MinIO connection.
///
/// The bucket is not part of the configuration: every operation names
/// its bucket, and one client is built per bucket on first use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectStorageConfig {
    /// S3/MinIO endpoint URL
    pub endpoint: String,
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// AWS region (use "us-east-1" for MinIO)
    pub region: String,
    /// Allow HTTP (for local MinIO)
    pub allow_http: bool,
}

impl Default for ObjectStorageConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://minio:9000".to_string(),
            access_key_id: "minioadmin".to_string(),
            secret_access_key: "minioadmin".to_string(),
            region: "us-east-1".to_string(),
            allow_http: true,
        }
    }
}

/// Where objects live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageBackend {
    /// S3 or an S3-compatible service
    S3(ObjectStorageConfig),
    /// One directory per bucket under `root`
    Local { root: PathBuf },
    /// Process-local memory, one store per bucket
    Memory,
}

/// Object storage client addressing any number of buckets.
pub struct ObjectStorage {
    backend: StorageBackend,
    stores: Mutex<HashMap<String, Arc<dyn ObjectStore>>>,
}

impl ObjectStorage {
    /// Create a client for the given backend. Buckets are opened lazily.
    pub fn new(backend: StorageBackend) -> Self {
        Self {
            backend,
            stores: Mutex::new(HashMap::new()),
        }
    }

    /// Create an S3/MinIO client.
    pub fn s3(config: ObjectStorageConfig) -> Self {
        Self::new(StorageBackend::S3(config))
    }

    /// Create a client over a local directory tree.
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self::new(StorageBackend::Local { root: root.into() })
    }

    /// Create an in-memory client.
    pub fn in_memory() -> Self {
        Self::new(StorageBackend::Memory)
    }

    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    /// Get (or build and cache) the store for `bucket`.
    async fn store(&self, bucket: &str) -> StorageResult<Arc<dyn ObjectStore>> {
        if bucket.is_empty() {
            return Err(StorageError::Config("bucket name is empty".to_string()));
        }

        let mut stores = self.stores.lock().await;
        if let Some(store) = stores.get(bucket) {
            return Ok(store.clone());
        }

        let store = self.build_store(bucket)?;
        stores.insert(bucket.to_string(), store.clone());
        debug!(bucket = %bucket, "Opened bucket");
        Ok(store)
    }

    fn build_store(&self, bucket: &str) -> StorageResult<Arc<dyn ObjectStore>> {
        match &self.backend {
            StorageBackend::S3(config) => {
                let mut builder = AmazonS3Builder::new()
                    .with_endpoint(&config.endpoint)
                    .with_bucket_name(bucket)
                    .with_access_key_id(&config.access_key_id)
                    .with_secret_access_key(&config.secret_access_key)
                    .with_region(&config.region);

                if config.allow_http {
                    builder = builder.with_allow_http(true);
                }

                let store = builder.build().map_err(|e| {
                    StorageError::Config(format!("Failed to create S3 client: {}", e))
                })?;
                Ok(Arc::new(store))
            }
            StorageBackend::Local { root } => {
                let dir = root.join(bucket);
                std::fs::create_dir_all(&dir)?;
                let store = LocalFileSystem::new_with_prefix(&dir).map_err(|e| {
                    StorageError::Config(format!("Failed to open {}: {}", dir.display(), e))
                })?;
                Ok(Arc::new(store))
            }
            StorageBackend::Memory => Ok(Arc::new(InMemory::new())),
        }
    }

    /// Write bytes to a key in the bucket.
    #[instrument(skip(self, data), fields(bucket = %bucket, key = %key))]
    pub async fn put(&self, bucket: &str, key: &str, data: Bytes) -> StorageResult<()> {
        let location = object_path(key)?;
        debug!(size = data.len(), "Writing object");

        self.store(bucket)
            .await?
            .put(&location, data.into())
            .await
            .map_err(|e| map_error(e, bucket, key))?;

        Ok(())
    }

    /// Read bytes from a key.
    #[instrument(skip(self), fields(bucket = %bucket, key = %key))]
    pub async fn get(&self, bucket: &str, key: &str) -> StorageResult<Bytes> {
        let location = object_path(key)?;

        let result = self
            .store(bucket)
            .await?
            .get(&location)
            .await
            .map_err(|e| map_error(e, bucket, key))?;

        let bytes = result.bytes().await.map_err(|e| map_error(e, bucket, key))?;

        debug!(size = bytes.len(), "Read object");
        Ok(bytes)
    }

    /// Check if an object exists.
    pub async fn exists(&self, bucket: &str, key: &str) -> StorageResult<bool> {
        let location = object_path(key)?;

        match self.store(bucket).await?.head(&location).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::Backend(format!(
                "Failed to check {}/{}: {}",
                bucket, key, e
            ))),
        }
    }
}

#[async_trait]
impl ObjectTransfer for ObjectStorage {
    #[instrument(skip(self), fields(path = %local_path.display()))]
    async fn download(&self, bucket: &str, key: &str, local_path: &LocalPath) -> StorageResult<()> {
        let data = self.get(bucket, key).await?;
        tokio::fs::write(local_path, &data).await?;
        debug!(size = data.len(), "Downloaded object");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %local_path.display()))]
    async fn upload(&self, local_path: &LocalPath, bucket: &str, key: &str) -> StorageResult<()> {
        let data = tokio::fs::read(local_path).await?;
        self.put(bucket, key, Bytes::from(data)).await
    }
}

/// Parse a raw object key without rewriting it.
///
/// `Path::from` would collapse empty segments and percent-encode `..`,
/// so the object reached would not be the one the key names. Keys
/// that cannot be addressed verbatim are rejected instead.
fn object_path(key: &str) -> StorageResult<Path> {
    Path::parse(key).map_err(|e| StorageError::InvalidKey {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

fn map_error(err: object_store::Error, bucket: &str, key: &str) -> StorageError {
    match err {
        object_store::Error::NotFound { .. } => StorageError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        },
        other => StorageError::Backend(format!("{}/{}: {}", bucket, key, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_put_get_roundtrip() {
        let storage = ObjectStorage::in_memory();
        storage
            .put("bucket", "input/a.png", Bytes::from_static(b"abc"))
            .await
            .unwrap();

        assert_eq!(storage.get("bucket", "input/a.png").await.unwrap(), "abc");
        assert!(storage.exists("bucket", "input/a.png").await.unwrap());
        assert!(!storage.exists("other", "input/a.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_object_is_not_found() {
        let storage = ObjectStorage::in_memory();
        let err = storage.get("bucket", "nope").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_empty_bucket_name_is_rejected() {
        let storage = ObjectStorage::in_memory();
        let err = storage.get("", "key").await.unwrap_err();
        assert!(matches!(err, StorageError::Config(_)));
    }

    #[tokio::test]
    async fn test_keys_are_used_verbatim() {
        let storage = ObjectStorage::in_memory();
        storage
            .put("bucket", "input/50%.png", Bytes::from_static(b"pct"))
            .await
            .unwrap();

        assert!(storage.exists("bucket", "input/50%.png").await.unwrap());
        assert!(!storage.exists("bucket", "input/50%25.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_unaddressable_keys_are_rejected() {
        let storage = ObjectStorage::in_memory();
        storage
            .put("bucket", "input/a.png", Bytes::from_static(b"x"))
            .await
            .unwrap();

        for key in ["input//a.png", "input/../a.png", "input/./a.png"] {
            let err = storage.get("bucket", key).await.unwrap_err();
            assert!(
                matches!(err, StorageError::InvalidKey { key: ref k, .. } if k == key),
                "{key}: {err}"
            );
        }
    }

    #[test]
    fn test_backend_config_serde() {
        let json = r#"{"type":"local","root":"/srv/buckets"}"#;
        let backend: StorageBackend = serde_json::from_str(json).unwrap();
        assert!(matches!(backend, StorageBackend::Local { ref root } if root == &PathBuf::from("/srv/buckets")));
    }
}
