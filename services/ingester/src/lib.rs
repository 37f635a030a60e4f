//! Bucket notification consumer.
//!
//! Wires the ingestion pipeline to its triggers: an HTTP webhook for
//! S3/MinIO bucket notifications and one-shot processing of an event
//! document.

pub mod config;
pub mod server;

pub use config::IngesterConfig;
pub use server::{build_router, start_server, ServerState};
