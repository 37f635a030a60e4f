//! Notification batch processing.
//!
//! Each record goes through filter -> stage -> fetch -> transform ->
//! relocate inside its own failure boundary. Records are handled in
//! batch order, one at a time. Whatever happens to a record, the batch
//! status is [`BatchStatus::Done`]; per-record results are available
//! from [`Pipeline::process_detailed`] and the log.

use futures::FutureExt;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use storage::ObjectTransfer;

use crate::error::{IngestionError, Result};
use crate::event::{Notification, S3Event};
use crate::filter::{accept_key, base_filename, output_key, SkipReason};
use crate::transform::{FileTransform, SpectrumTransform};
use crate::workspace::Workspace;

/// Options for pipeline runs.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Parent directory for per-notification workspaces
    /// (system temp directory when unset)
    pub workspace_dir: Option<PathBuf>,
}

/// Fixed status returned for every batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchStatus {
    Done,
}

/// Result of processing one notification.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Skipped {
        reason: SkipReason,
    },
    Succeeded {
        destination_key: String,
    },
    Failed {
        kind: &'static str,
        #[serde(serialize_with = "serialize_display")]
        error: IngestionError,
    },
}

impl Outcome {
    fn failed(error: IngestionError) -> Self {
        Outcome::Failed {
            kind: error.kind(),
            error,
        }
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, Outcome::Succeeded { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

fn serialize_display<S: Serializer>(
    error: &IngestionError,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Outcome of one record, with whatever addressing could be read from it.
#[derive(Debug, Serialize)]
pub struct RecordReport {
    /// Position in the batch
    pub index: usize,
    pub bucket: Option<String>,
    pub key: Option<String>,
    pub outcome: Outcome,
}

/// Per-record outcomes of a batch, in batch order.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub records: Vec<RecordReport>,
}

impl BatchReport {
    fn push(&mut self, report: RecordReport) {
        self.total += 1;
        match report.outcome {
            Outcome::Skipped { .. } => self.skipped += 1,
            Outcome::Succeeded { .. } => self.succeeded += 1,
            Outcome::Failed { .. } => self.failed += 1,
        }
        self.records.push(report);
    }

    /// The fixed batch status.
    pub fn status(&self) -> BatchStatus {
        BatchStatus::Done
    }
}

/// Processes notification batches against an injected storage capability.
pub struct Pipeline {
    storage: Arc<dyn ObjectTransfer>,
    transform: Arc<dyn FileTransform>,
    options: PipelineOptions,
}

impl Pipeline {
    /// Create a pipeline using the spectral magnitude transform.
    pub fn new(storage: Arc<dyn ObjectTransfer>) -> Self {
        Self {
            storage,
            transform: Arc::new(SpectrumTransform),
            options: PipelineOptions::default(),
        }
    }

    /// Replace the transform step.
    pub fn with_transform(mut self, transform: Arc<dyn FileTransform>) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Process a batch, returning the fixed status.
    pub async fn process(&self, event: &S3Event) -> BatchStatus {
        self.process_detailed(event).await.status()
    }

    /// Process a batch, returning every record's outcome.
    pub async fn process_detailed(&self, event: &S3Event) -> BatchReport {
        let mut report = BatchReport::default();

        for (index, record) in event.records.iter().enumerate() {
            report.push(self.process_record(index, record).await);
        }

        info!(
            total = report.total,
            succeeded = report.succeeded,
            skipped = report.skipped,
            failed = report.failed,
            "Batch processed"
        );
        report
    }

    async fn process_record(&self, index: usize, record: &Value) -> RecordReport {
        let notification = match Notification::from_record(record) {
            Ok(notification) => notification,
            Err(e) => {
                error!(index, record = %record, error = %e, "Error processing record");
                return RecordReport {
                    index,
                    bucket: None,
                    key: None,
                    outcome: Outcome::failed(e),
                };
            }
        };

        let outcome = match AssertUnwindSafe(self.process_notification(&notification))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(panic) => Outcome::failed(IngestionError::Panicked(panic_message(panic.as_ref()))),
        };

        if let Outcome::Failed { error: e, .. } = &outcome {
            error!(index, record = %record, error = %e, "Error processing record");
        }

        RecordReport {
            index,
            bucket: Some(notification.bucket),
            key: Some(notification.key),
            outcome,
        }
    }

    /// Filter, stage, transform and relocate one notification.
    #[instrument(skip(self, notification), fields(bucket = %notification.bucket, key = %notification.key))]
    pub async fn process_notification(&self, notification: &Notification) -> Outcome {
        if let Err(reason) = accept_key(&notification.key) {
            match reason {
                SkipReason::NotInInputPrefix => {
                    info!("Skipping file as it is not in input/ prefix")
                }
                SkipReason::NotPng => warn!("Skipping file as it is not a PNG file"),
            }
            return Outcome::Skipped { reason };
        }

        info!("Processing object");
        match self.run(notification).await {
            Ok(destination_key) => {
                info!(destination = %destination_key, "Successfully processed");
                Outcome::Succeeded { destination_key }
            }
            Err(e) => Outcome::failed(e),
        }
    }

    async fn run(&self, notification: &Notification) -> Result<String> {
        let workspace = Workspace::acquire(
            self.options.workspace_dir.as_deref(),
            base_filename(&notification.key),
        )
        .map_err(IngestionError::Workspace)?;

        let result = self.stage_and_transform(&workspace, notification).await;
        workspace.release();
        result
    }

    async fn stage_and_transform(
        &self,
        workspace: &Workspace,
        notification: &Notification,
    ) -> Result<String> {
        let Notification { bucket, key } = notification;

        self.storage
            .download(bucket, key, workspace.source_path())
            .await
            .map_err(|source| IngestionError::Download {
                bucket: bucket.clone(),
                key: key.clone(),
                source,
            })?;

        self.transform
            .apply(workspace.source_path(), workspace.result_path())
            .await?;

        let destination_key = output_key(key);
        self.storage
            .upload(workspace.result_path(), bucket, &destination_key)
            .await
            .map_err(|source| IngestionError::Upload {
                bucket: bucket.clone(),
                key: destination_key.clone(),
                source,
            })?;

        Ok(destination_key)
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_status_serialization() {
        let json = serde_json::to_string(&BatchStatus::Done).unwrap();
        assert_eq!(json, r#"{"status":"done"}"#);
    }

    #[test]
    fn test_outcome_serialization() {
        let skipped = Outcome::Skipped {
            reason: SkipReason::NotPng,
        };
        assert_eq!(
            serde_json::to_value(&skipped).unwrap(),
            serde_json::json!({"status": "skipped", "reason": "not_png"})
        );

        let failed = Outcome::failed(IngestionError::MalformedRecord("missing s3".into()));
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["kind"], "structural");
        assert_eq!(value["error"], "Malformed notification record: missing s3");
    }

    #[test]
    fn test_batch_report_counts() {
        let mut report = BatchReport::default();
        report.push(RecordReport {
            index: 0,
            bucket: None,
            key: None,
            outcome: Outcome::failed(IngestionError::MalformedRecord("x".into())),
        });
        report.push(RecordReport {
            index: 1,
            bucket: Some("b".into()),
            key: Some("input/a.png".into()),
            outcome: Outcome::Succeeded {
                destination_key: "output/fft-a.png".into(),
            },
        });

        assert_eq!((report.total, report.succeeded, report.failed, report.skipped), (2, 1, 1, 0));
        assert_eq!(report.status(), BatchStatus::Done);
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");
        let boxed: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(boxed.as_ref()), "bang");
    }
}
