//! Tests for the ingester HTTP server.
//!
//! Requests go through the real router with an in-memory storage
//! backend, so no network or object store is required.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use bytes::Bytes;
use std::sync::Arc;
use tower::ServiceExt;

use ingester::{build_router, ServerState};
use ingestion::Pipeline;
use storage::ObjectStorage;
use test_utils::{gray_png_bytes, keys, ramp_samples, s3_event, s3_event_from, s3_record, s3_record_missing_key};

async fn setup() -> (Arc<ObjectStorage>, Arc<ServerState>) {
    let storage = Arc::new(ObjectStorage::in_memory());
    storage
        .put(
            keys::BUCKET,
            keys::VALID_PNG,
            Bytes::from(gray_png_bytes(4, 4, &ramp_samples(4, 4))),
        )
        .await
        .unwrap();

    let state = Arc::new(ServerState::new(Pipeline::new(storage.clone())));
    (storage, state)
}

fn post_events(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/events")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ============================================================================
// POST /events
// ============================================================================

#[tokio::test]
async fn test_events_processes_batch() {
    let (storage, state) = setup().await;
    let app = build_router(state);

    let response = app
        .oneshot(post_events(s3_event(keys::BUCKET, keys::VALID_PNG).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, serde_json::json!({"status": "done"}));
    assert!(storage
        .exists(keys::BUCKET, keys::VALID_PNG_OUTPUT)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_events_status_is_fixed_when_records_fail() {
    let (storage, state) = setup().await;
    let app = build_router(state);

    let batch = s3_event_from(vec![
        s3_record_missing_key(keys::BUCKET),
        s3_record(keys::BUCKET, "input/missing.png"),
        s3_record(keys::BUCKET, keys::NOT_PNG),
    ]);
    let response = app.oneshot(post_events(batch.to_string())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "done");
    assert!(!storage
        .exists(keys::BUCKET, "output/fft-missing.png")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_events_rejects_invalid_json() {
    let (_storage, state) = setup().await;
    let app = build_router(state);

    let response = app
        .oneshot(post_events("{not json".to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["error"].is_string());
}

// ============================================================================
// GET /status and /health
// ============================================================================

#[tokio::test]
async fn test_status_reports_recent_batches() {
    let (_storage, state) = setup().await;

    let batch = s3_event_from(vec![
        s3_record(keys::BUCKET, keys::OUTSIDE_PREFIX),
        s3_record(keys::BUCKET, keys::VALID_PNG),
    ]);
    build_router(state.clone())
        .oneshot(post_events(batch.to_string()))
        .await
        .unwrap();

    let response = build_router(state)
        .oneshot(Request::get("/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let status = json_body(response).await;
    assert_eq!(status["total_tracked"], 1);
    let recent = &status["recent"][0];
    assert_eq!(recent["total"], 2);
    assert_eq!(recent["skipped"], 1);
    assert_eq!(recent["succeeded"], 1);
    assert_eq!(recent["records"][0]["outcome"]["status"], "skipped");
    assert_eq!(recent["records"][0]["outcome"]["reason"], "not_in_input_prefix");
    assert_eq!(
        recent["records"][1]["outcome"]["destination_key"],
        keys::VALID_PNG_OUTPUT
    );
}

#[tokio::test]
async fn test_health() {
    let (_storage, state) = setup().await;

    let response = build_router(state)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "ingester");
}
