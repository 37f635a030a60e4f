//! Ingester configuration.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use ingestion::PipelineOptions;
use storage::{ObjectStorageConfig, StorageBackend};

/// Top-level ingester configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngesterConfig {
    /// Where buckets live
    pub storage: StorageBackend,

    /// Parent directory for per-notification workspaces
    pub workspace_dir: Option<PathBuf>,

    /// HTTP port for the webhook server
    pub port: u16,
}

impl Default for IngesterConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::S3(ObjectStorageConfig::default()),
            workspace_dir: None,
            port: 8080,
        }
    }
}

impl IngesterConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let storage = match var("STORAGE_BACKEND", "s3").to_lowercase().as_str() {
            "s3" => StorageBackend::S3(ObjectStorageConfig {
                endpoint: var("S3_ENDPOINT", "http://minio:9000"),
                access_key_id: var("S3_ACCESS_KEY", "minioadmin"),
                secret_access_key: var("S3_SECRET_KEY", "minioadmin"),
                region: var("S3_REGION", "us-east-1"),
                allow_http: lookup("S3_ALLOW_HTTP").map(|v| v == "true").unwrap_or(true),
            }),
            "local" => StorageBackend::Local {
                root: PathBuf::from(var("STORAGE_ROOT", "/data/buckets")),
            },
            "memory" => StorageBackend::Memory,
            other => bail!("Unknown STORAGE_BACKEND: {}", other),
        };

        let workspace_dir = lookup("WORKSPACE_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);

        let port = match lookup("INGESTER_PORT") {
            Some(port) => port.parse()?,
            None => 8080,
        };

        Ok(Self {
            storage,
            workspace_dir,
            port,
        })
    }

    /// Pipeline options derived from this configuration.
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            workspace_dir: self.workspace_dir.clone(),
        }
    }
}
