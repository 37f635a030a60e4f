//! End-to-end tests for `ingester --event-file` against a local bucket tree.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use test_utils::{keys, ramp_samples, s3_event, write_gray_png};

fn ingester(buckets: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_ingester"));
    command
        .env("STORAGE_BACKEND", "local")
        .env("STORAGE_ROOT", buckets)
        .env("RUST_LOG", "off");
    command
}

fn seed_input(buckets: &Path) {
    let source = buckets.join(keys::BUCKET).join(keys::VALID_PNG);
    std::fs::create_dir_all(source.parent().unwrap()).unwrap();
    write_gray_png(&source, 4, 4, &ramp_samples(4, 4));
}

fn assert_done(output: &Output) {
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().last(), Some(r#"{"status":"done"}"#));
}

#[test]
fn test_event_file_is_processed() {
    let buckets = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    seed_input(buckets.path());

    let event_path = scratch.path().join("event.json");
    let event = s3_event(keys::BUCKET, keys::VALID_PNG);
    std::fs::write(&event_path, event.to_string()).unwrap();

    let output = ingester(buckets.path())
        .arg("--event-file")
        .arg(&event_path)
        .output()
        .unwrap();

    assert_done(&output);
    let result = buckets.path().join(keys::BUCKET).join(keys::VALID_PNG_OUTPUT);
    assert_eq!(spectrum::load_raster(&result).unwrap().dimensions(), (4, 4));
}

#[test]
fn test_event_read_from_stdin() {
    let buckets = tempfile::tempdir().unwrap();
    seed_input(buckets.path());

    let mut child = ingester(buckets.path())
        .args(["--event-file", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    let event = s3_event(keys::BUCKET, keys::VALID_PNG);
    child
        .stdin
        .take()
        .unwrap()
        .write_all(event.to_string().as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert_done(&output);
    assert!(buckets
        .path()
        .join(keys::BUCKET)
        .join(keys::VALID_PNG_OUTPUT)
        .exists());
}

#[test]
fn test_missing_event_file_fails() {
    let buckets = tempfile::tempdir().unwrap();

    let output = ingester(buckets.path())
        .arg("--event-file")
        .arg(buckets.path().join("missing.json"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read"));
}
