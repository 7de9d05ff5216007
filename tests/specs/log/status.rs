//! Log status specs

use crate::prelude::*;
use predicates::prelude::*;

#[test]
fn status_summarizes_the_whole_log() {
    let fixture = Fixture::new();
    let dir = fixture.sample_log();

    fixture
        .pit()
        .args(["log", "status", "-p"])
        .arg(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"scannedEntries\": 5"))
        .stdout(predicate::str::contains("\"lowestIndex\": 1"))
        .stdout(predicate::str::contains("\"highestIndex\": 5"))
        .stdout(predicate::str::contains("\"highestTerm\": 2"))
        .stdout(predicate::str::contains("\"lowestRecordPosition\": 100"))
        .stdout(predicate::str::contains("\"highestRecordPosition\": 104"));
}

#[test]
fn text_format_prints_one_line() {
    let fixture = Fixture::new();
    let dir = fixture.sample_log();

    let assert = fixture
        .pit()
        .args(["log", "status", "--format", "text", "-p"])
        .arg(&dir)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.starts_with("{\"scannedEntries\":5"));
}

#[test]
fn missing_partition_directory_fails() {
    let fixture = Fixture::new();
    fixture
        .pit()
        .args(["log", "status", "-p"])
        .arg(fixture.path("9"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("log not found"));
}

#[test]
fn non_numeric_partition_directory_fails() {
    let fixture = Fixture::new();
    let dir = fixture.path("not-a-partition");
    std::fs::create_dir(&dir).unwrap();

    fixture
        .pit()
        .args(["log", "status", "-p"])
        .arg(&dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a partition directory"));
}
