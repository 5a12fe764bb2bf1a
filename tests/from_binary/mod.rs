//! Integration tests running the crate binary in dry-run mode against the fixtures in
//! `tests/data/`.

use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("fixtures")
}

fn run_binary(args: &[&str]) -> Output {
    run_binary_with_env(args, &[])
}

fn run_binary_with_env(args: &[&str], envs: &[(&str, &str)]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cdc-replay-rs"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("LOG_FORMAT")
        .envs(envs.iter().copied())
        .output()
        .expect("failed to execute binary")
}

#[test]
fn dry_run_prints_envelopes_in_replay_order() {
    let dir = fixtures_dir();
    let output = run_binary(&[
        "--directory",
        dir.to_str().unwrap(),
        "--stream-name",
        "stream-name",
        "--operation",
        "insert",
        "--batch-size",
        "2",
        "--dry-run",
    ]);

    assert!(
        output.status.success(),
        "binary exited with non-zero status.\nstderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).expect("binary output was not valid UTF-8");
    let envelopes: Vec<Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line is one JSON envelope"))
        .collect();

    let pairs: Vec<(String, i64)> = envelopes
        .iter()
        .map(|e| {
            (
                e["metadata"]["table-name"].as_str().unwrap().to_string(),
                e["data"]["id"].as_i64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("orders".to_string(), 100),
            ("orders".to_string(), 101),
            ("orders".to_string(), 102),
            ("customers".to_string(), 1),
        ]
    );
    assert!(envelopes.iter().all(|e| e["metadata"]["operation"] == "insert"));
}

#[test]
fn dry_run_prints_the_summary_to_stderr() {
    let dir = fixtures_dir();
    let output = run_binary(&[
        "-d",
        dir.to_str().unwrap(),
        "-s",
        "stream-name",
        "--dry-run",
    ]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(r#""loadedRecords": 4"#), "stderr: {stderr}");
    assert!(stderr.contains(r#""streamName": "stream-name""#), "stderr: {stderr}");

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains("loadedRecords"));
    assert_eq!(stdout.lines().count(), 4);
}

#[test]
fn missing_directory_is_logged_as_an_error() {
    let output = run_binary_with_env(
        &["-d", "does/not/exist", "-s", "stream-name", "--dry-run"],
        &[("LOG_FORMAT", "json")],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error running cli"), "stderr: {stderr}");
    assert!(stderr.contains(r#""level":"ERROR""#), "stderr: {stderr}");
    assert!(stderr.contains("does/not/exist"), "stderr: {stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn invalid_operation_is_rejected_by_the_cli() {
    let dir = fixtures_dir();
    let output = run_binary(&[
        "-d",
        dir.to_str().unwrap(),
        "-s",
        "stream-name",
        "-o",
        "banana",
        "--dry-run",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid operation banana"), "stderr: {stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn invalid_batch_size_is_rejected_by_the_cli() {
    let dir = fixtures_dir();
    let output = run_binary(&[
        "-d",
        dir.to_str().unwrap(),
        "-s",
        "stream-name",
        "-b",
        "0",
        "--dry-run",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid batch size 0"), "stderr: {stderr}");
}
