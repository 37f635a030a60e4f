//! File-to-file transform step.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{IngestionError, Result};

/// Turns a staged source file into a result file.
#[async_trait]
pub trait FileTransform: Send + Sync {
    async fn apply(&self, source: &Path, destination: &Path) -> Result<()>;
}

/// Spectral magnitude transform backed by [`spectrum::compute_fft`].
///
/// Runs on the blocking thread pool and is awaited before returning, so
/// at most one transform is in flight per pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpectrumTransform;

#[async_trait]
impl FileTransform for SpectrumTransform {
    async fn apply(&self, source: &Path, destination: &Path) -> Result<()> {
        let source: PathBuf = source.to_path_buf();
        let destination: PathBuf = destination.to_path_buf();

        tokio::task::spawn_blocking(move || spectrum::compute_fft(&source, &destination))
            .await
            .map_err(|e| IngestionError::TransformTask(e.to_string()))??;

        Ok(())
    }
}
