//! Tests for the `ObjectTransfer` implementation of `ObjectStorage`.
//!
//! Exercises the local-directory and in-memory backends without any
//! network access.

use bytes::Bytes;
use storage::{ObjectStorage, ObjectTransfer, StorageError};

#[tokio::test]
async fn test_local_backend_download_and_upload() {
    let buckets = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let storage = ObjectStorage::local(buckets.path());

    storage
        .put("images", "input/scan.png", Bytes::from_static(b"png-bytes"))
        .await
        .unwrap();
    // One directory per bucket, keys map to nested paths.
    assert!(buckets.path().join("images/input/scan.png").exists());

    let local = scratch.path().join("scan.png");
    storage.download("images", "input/scan.png", &local).await.unwrap();
    assert_eq!(std::fs::read(&local).unwrap(), b"png-bytes");

    let result = scratch.path().join("fft-scan.png");
    std::fs::write(&result, b"result-bytes").unwrap();
    storage
        .upload(&result, "images", "output/fft-scan.png")
        .await
        .unwrap();

    assert_eq!(
        storage.get("images", "output/fft-scan.png").await.unwrap(),
        Bytes::from_static(b"result-bytes")
    );
}

#[tokio::test]
async fn test_download_missing_object_leaves_no_file() {
    let scratch = tempfile::tempdir().unwrap();
    let storage = ObjectStorage::in_memory();
    let local = scratch.path().join("missing.png");

    let err = storage
        .download("images", "input/missing.png", &local)
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::NotFound { .. }));
    assert!(!local.exists());
}

#[tokio::test]
async fn test_upload_missing_local_file_is_io_error() {
    let scratch = tempfile::tempdir().unwrap();
    let storage = ObjectStorage::in_memory();

    let err = storage
        .upload(&scratch.path().join("nothing.png"), "images", "output/x.png")
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Io(_)));
    assert!(!storage.exists("images", "output/x.png").await.unwrap());
}

#[tokio::test]
async fn test_buckets_are_isolated() {
    let storage = ObjectStorage::in_memory();
    storage
        .put("a", "input/x.png", Bytes::from_static(b"1"))
        .await
        .unwrap();

    assert!(storage.exists("a", "input/x.png").await.unwrap());
    assert!(!storage.exists("b", "input/x.png").await.unwrap());
}
