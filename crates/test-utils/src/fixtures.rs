//! S3 event notification fixtures.
//!
//! Mirrors the document shape delivered by S3 and MinIO bucket
//! notifications: `{"Records": [{"s3": {"bucket": {"name": ..}, "object": {"key": ..}}}]}`.

use serde_json::{json, Value};

/// Common bucket and key values used across tests.
pub mod keys {
    pub const BUCKET: &str = "test-bucket";
    pub const VALID_PNG: &str = "input/test_image.png";
    pub const VALID_PNG_OUTPUT: &str = "output/fft-test_image.png";
    pub const UPPERCASE_PNG: &str = "input/SCAN.PNG";
    pub const NESTED_PNG: &str = "input/2024/01/scan.png";
    pub const OUTSIDE_PREFIX: &str = "other/test_image.png";
    pub const NOT_PNG: &str = "input/test_image.jpg";
}

/// A single well-formed notification record.
pub fn s3_record(bucket: &str, key: &str) -> Value {
    json!({
        "eventVersion": "2.1",
        "eventSource": "aws:s3",
        "eventName": "ObjectCreated:Put",
        "s3": {
            "bucket": { "name": bucket },
            "object": { "key": key, "size": 1024 }
        }
    })
}

/// A record with no `s3.object.key`.
pub fn s3_record_missing_key(bucket: &str) -> Value {
    json!({
        "eventName": "ObjectCreated:Put",
        "s3": { "bucket": { "name": bucket }, "object": {} }
    })
}

/// A record with no `s3.bucket` block.
pub fn s3_record_missing_bucket(key: &str) -> Value {
    json!({
        "eventName": "ObjectCreated:Put",
        "s3": { "object": { "key": key } }
    })
}

/// Wraps records into an event document.
pub fn s3_event_from(records: Vec<Value>) -> Value {
    json!({ "Records": records })
}

/// An event document with a single well-formed record.
pub fn s3_event(bucket: &str, key: &str) -> Value {
    s3_event_from(vec![s3_record(bucket, key)])
}
