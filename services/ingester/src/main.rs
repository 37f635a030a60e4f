//! Bucket notification consumer.
//!
//! Runs the FFT magnitude pipeline for S3/MinIO "object created"
//! notifications, either from a webhook server or a single event
//! document on disk/stdin.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use ingester::{start_server, IngesterConfig, ServerState};
use ingestion::{Pipeline, S3Event};
use storage::ObjectStorage;

#[derive(Parser, Debug)]
#[command(name = "ingester")]
#[command(about = "Turns PNGs dropped under input/ into FFT magnitude images under output/")]
struct Args {
    /// Process one event document ("-" for stdin) and exit instead of serving
    #[arg(long)]
    event_file: Option<String>,

    /// Webhook server port (overrides INGESTER_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Parent directory for per-notification workspaces (overrides WORKSPACE_DIR)
    #[arg(long)]
    workspace_dir: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    info!("Starting ingester");

    let mut config = IngesterConfig::from_env()?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(dir) = args.workspace_dir {
        config.workspace_dir = Some(dir);
    }
    info!(backend = ?config.storage, "Loaded configuration");

    let storage = Arc::new(ObjectStorage::new(config.storage.clone()));
    let pipeline = Pipeline::new(storage).with_options(config.pipeline_options());

    match args.event_file {
        Some(path) => run_once(&pipeline, &path).await,
        None => {
            let state = Arc::new(ServerState::new(pipeline));
            start_server(state, config.port).await
        }
    }
}

/// Process a single event document and print the batch status.
async fn run_once(pipeline: &Pipeline, path: &str) -> Result<()> {
    let data = if path == "-" {
        let mut buffer = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buffer)
            .await
            .context("Failed to read event from stdin")?;
        buffer
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path))?
    };

    let event = S3Event::from_json(&data)?;
    info!(records = event.len(), source = %path, "Processing event document");

    let report = pipeline.process_detailed(&event).await;
    println!("{}", serde_json::to_string(&report.status())?);

    Ok(())
}
