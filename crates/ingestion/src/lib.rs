//! Event-driven FFT magnitude ingestion.
//!
//! Consumes S3/MinIO "object created" notification batches and, for
//! each PNG placed under `input/`, writes its spectral magnitude image
//! to `output/fft-<name>` in the same bucket.
//!
//! # Architecture
//!
//! - `event`: notification document schema and record validation
//! - `filter`: key acceptance rules and output key derivation
//! - `workspace`: per-notification scratch directory
//! - `transform`: file-to-file transform seam (spectrum by default)
//! - `pipeline`: sequential, per-record fault-isolated processing
//!
//! Storage is reached only through [`storage::ObjectTransfer`], which
//! the caller injects.

pub mod error;
pub mod event;
pub mod filter;
pub mod pipeline;
pub mod transform;
pub mod workspace;

// Re-exports
pub use error::{IngestionError, Result};
pub use event::{Notification, S3Event};
pub use filter::{accept_key, base_filename, output_key, SkipReason};
pub use pipeline::{BatchReport, BatchStatus, Outcome, Pipeline, PipelineOptions, RecordReport};
pub use transform::{FileTransform, SpectrumTransform};
pub use workspace::Workspace;
