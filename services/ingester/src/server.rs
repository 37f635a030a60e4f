//! HTTP server for the ingester service.
//!
//! Provides endpoints for:
//! - `POST /events` - Process an S3/MinIO bucket notification batch
//! - `GET /status` - Recently processed batches
//! - `GET /health` - Health check

use axum::{
    body::Bytes,
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use ingestion::{BatchReport, Pipeline, S3Event};

/// Shared state for the HTTP server.
pub struct ServerState {
    /// Held for the whole batch so batches never overlap
    pipeline: Mutex<Pipeline>,
    /// Recently completed batches
    pub tracker: BatchTracker,
}

impl ServerState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Mutex::new(pipeline),
            tracker: BatchTracker::new(100),
        }
    }
}

/// A processed batch.
#[derive(Debug, Clone, Serialize)]
pub struct CompletedBatch {
    pub id: String,
    pub received_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Per-record outcomes as reported by the pipeline
    pub records: serde_json::Value,
}

/// Bounded history of processed batches, newest first.
pub struct BatchTracker {
    completed: Mutex<VecDeque<CompletedBatch>>,
    max_completed: usize,
}

impl BatchTracker {
    pub fn new(max_completed: usize) -> Self {
        Self {
            completed: Mutex::new(VecDeque::new()),
            max_completed,
        }
    }

    pub async fn record(&self, id: &str, received_at: DateTime<Utc>, report: &BatchReport) {
        let completed_at = Utc::now();
        let duration_ms = (completed_at - received_at).num_milliseconds().max(0) as u64;

        let batch = CompletedBatch {
            id: id.to_string(),
            received_at,
            completed_at,
            duration_ms,
            total: report.total,
            succeeded: report.succeeded,
            skipped: report.skipped,
            failed: report.failed,
            records: serde_json::to_value(&report.records).unwrap_or_default(),
        };

        let mut completed = self.completed.lock().await;
        completed.push_front(batch);

        // Keep only recent entries
        while completed.len() > self.max_completed {
            completed.pop_back();
        }
    }

    pub async fn get_status(&self) -> StatusResponse {
        let completed = self.completed.lock().await;

        StatusResponse {
            recent: completed.iter().take(20).cloned().collect(),
            total_tracked: completed.len(),
        }
    }
}

/// Response for /status endpoint.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub recent: Vec<CompletedBatch>,
    pub total_tracked: usize,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// POST /events - Process a notification batch
async fn events_handler(Extension(state): Extension<Arc<ServerState>>, body: Bytes) -> Response {
    let id = Uuid::new_v4().to_string();
    let received_at = Utc::now();

    let event = match S3Event::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!(id = %id, error = %e, "Rejected event document");
            let response = ErrorResponse {
                error: e.to_string(),
            };
            return (StatusCode::BAD_REQUEST, Json(response)).into_response();
        }
    };

    info!(id = %id, records = event.len(), "Received notification batch");

    let report = {
        let pipeline = state.pipeline.lock().await;
        pipeline.process_detailed(&event).await
    };

    state.tracker.record(&id, received_at, &report).await;

    (StatusCode::OK, Json(report.status())).into_response()
}

/// GET /status - Recently processed batches
async fn status_handler(Extension(state): Extension<Arc<ServerState>>) -> impl IntoResponse {
    let status = state.tracker.get_status().await;
    Json(status)
}

/// GET /health - Health check
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "ingester".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build the HTTP router.
pub fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/events", post(events_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(Extension(state))
}

/// Start the HTTP server.
pub async fn start_server(state: Arc<ServerState>, port: u16) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(port = port, "Starting ingester HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
