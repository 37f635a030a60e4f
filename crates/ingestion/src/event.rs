//! S3/MinIO bucket notification schema.
//!
//! Records are kept as raw JSON in the batch and validated one at a time
//! while processing, so one malformed record cannot reject its siblings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{IngestionError, Result};

/// A batch of notification records.
///
/// A document without a `Records` array is an empty batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records", default)]
    pub records: Vec<Value>,
}

impl S3Event {
    /// Parse an event document.
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Parse an event document from raw bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct EventRecord {
    s3: Option<S3Entity>,
}

#[derive(Debug, Deserialize)]
struct S3Entity {
    bucket: Option<S3Bucket>,
    object: Option<S3Object>,
}

#[derive(Debug, Deserialize)]
struct S3Bucket {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct S3Object {
    key: Option<String>,
}

/// One storage object addressed by a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub bucket: String,
    pub key: String,
}

impl Notification {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Extract `s3.bucket.name` and `s3.object.key` from a raw record.
    ///
    /// Missing, null, empty or mistyped fields are a
    /// [`IngestionError::MalformedRecord`].
    pub fn from_record(record: &Value) -> Result<Self> {
        let parsed: EventRecord = serde_json::from_value(record.clone())
            .map_err(|e| IngestionError::MalformedRecord(e.to_string()))?;

        let entity = parsed
            .s3
            .ok_or_else(|| IngestionError::MalformedRecord("missing s3".to_string()))?;

        let bucket = entity
            .bucket
            .and_then(|b| b.name)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| IngestionError::MalformedRecord("missing s3.bucket.name".to_string()))?;

        let key = entity
            .object
            .and_then(|o| o.key)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| IngestionError::MalformedRecord("missing s3.object.key".to_string()))?;

        Ok(Self { bucket, key })
    }
}
