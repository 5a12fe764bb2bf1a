//! Integration tests replaying fixtures from a real directory into the dry-run sink.

use std::fs;

use claims::{assert_err, assert_matches, assert_ok};
use serde_json::Value;

use cdc_replay_rs::{Error, FsDirectory, Replayer, StdoutSink};

use crate::support::{CountingProgress, fixed_clock, request};

#[test]
fn replays_a_directory_into_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("1.dbo.customers.json"),
        r#"[{"id": 1, "name": "Joselito Naruto"}, {"id": 2, "name": "Nagas Bike"}]"#,
    )
    .unwrap();
    fs::write(dir.path().join("2.dbo.orders.json"), r#"{"id": 10, "customer": 1}"#).unwrap();

    let mut req = request("load", 10);
    req.source_directory = dir.path().to_path_buf();

    let progress = CountingProgress::default();
    let mut replayer = Replayer::new(FsDirectory, StdoutSink::new(Vec::new()), progress.clone())
        .with_clock(fixed_clock());

    let summary = assert_ok!(replayer.invoke(req));
    assert_eq!(summary.loaded_records, 3);

    let output = String::from_utf8(replayer.into_sink().into_inner()).unwrap();
    let lines: Vec<Value> = output
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let tables: Vec<&str> = lines
        .iter()
        .map(|l| l["metadata"]["table-name"].as_str().unwrap())
        .collect();
    assert_eq!(tables, vec!["orders", "customers", "customers"]);
    assert_eq!(lines[2]["data"]["name"], "Nagas Bike");

    let totals = progress.totals.borrow();
    assert_eq!(totals["TOTAL PROGRESS"], 2);
    assert_eq!(totals["2-dbo-orders"], 1);
    assert_eq!(progress.advances.borrow()["TOTAL PROGRESS"], 2);
}

#[test]
fn malformed_json_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("1.s.t.json"), "[{").unwrap();

    let mut req = request("load", 1);
    req.source_directory = dir.path().to_path_buf();

    let mut replayer = Replayer::new(
        FsDirectory,
        StdoutSink::new(Vec::new()),
        CountingProgress::default(),
    );
    let err = assert_err!(replayer.invoke(req));

    assert_matches!(err, Error::Json { .. });
    assert!(replayer.into_sink().into_inner().is_empty());
}

#[test]
fn stray_file_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("1.s.t.json"), "{}").unwrap();
    fs::write(dir.path().join("README.md"), "notes").unwrap();

    let mut req = request("load", 1);
    req.source_directory = dir.path().to_path_buf();

    let mut replayer = Replayer::new(
        FsDirectory,
        StdoutSink::new(Vec::new()),
        CountingProgress::default(),
    );
    let err = assert_err!(replayer.invoke(req));

    assert_matches!(err, Error::InvalidFilename { filename, .. } if filename == "README.md");
}
