//! Log print specs

use crate::prelude::*;
use predicates::prelude::*;

fn stdout_of(assert: assert_cmd::assert::Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stdout).into_owned()
}

#[test]
fn prints_the_log_as_a_json_array() {
    let fixture = Fixture::new();
    let dir = fixture.sample_log();

    let assert = fixture
        .pit()
        .args(["log", "print", "-p"])
        .arg(&dir)
        .assert()
        .success();
    let entries: serde_json::Value = serde_json::from_str(&stdout_of(assert)).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 5);
    assert_eq!(entries[0]["index"], 1);
    assert_eq!(entries[1]["lowestPosition"], 100);
    assert_eq!(entries[1]["entries"][1]["sourceRecordPosition"], 100);
    assert_eq!(entries[2]["entries"][0]["rejectionType"], "INVALID_STATE");
}

#[test]
fn table_format_has_one_row_per_record() {
    let fixture = Fixture::new();
    let dir = fixture.sample_log();

    let assert = fixture
        .pit()
        .args(["log", "print", "--format", "table", "-p"])
        .arg(&dir)
        .assert()
        .success();
    let stdout = stdout_of(assert);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with("Index Term Position"));
    assert!(lines[1].starts_with("2 1 100 -1"));
    assert!(lines[1].ends_with("40 SERVICE_TASK"));
}

#[test]
fn dot_format_draws_the_causal_chain() {
    let fixture = Fixture::new();
    let dir = fixture.sample_log();

    let assert = fixture
        .pit()
        .args(["log", "print", "--format", "dot", "-p"])
        .arg(&dir)
        .assert()
        .success();
    let stdout = stdout_of(assert);
    assert!(stdout.starts_with("digraph log {"));
    assert!(stdout.contains("\"101\" -> \"100\";"));
    assert_eq!(stdout.matches(" -> ").count(), 1);
}

#[test]
fn from_index_skips_earlier_entries() {
    let fixture = Fixture::new();
    let dir = fixture.sample_log();

    let assert = fixture
        .pit()
        .args(["log", "print", "--from-index", "4", "-p"])
        .arg(&dir)
        .assert()
        .success();
    let entries: serde_json::Value = serde_json::from_str(&stdout_of(assert)).unwrap();
    let indexes: Vec<i64> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["index"].as_i64().unwrap())
        .collect();
    assert_eq!(indexes, vec![4, 5]);
}

#[test]
fn to_position_stops_at_the_boundary_batch() {
    let fixture = Fixture::new();
    let dir = fixture.sample_log();

    let assert = fixture
        .pit()
        .args(["log", "print", "--to-position", "102", "-p"])
        .arg(&dir)
        .assert()
        .success();
    let entries: serde_json::Value = serde_json::from_str(&stdout_of(assert)).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 2);
}

#[test]
fn instance_filter_keeps_matching_batches_only() {
    let fixture = Fixture::new();
    let dir = fixture.sample_log();

    let assert = fixture
        .pit()
        .args(["log", "print", "--instance-key", "40", "-p"])
        .arg(&dir)
        .assert()
        .success();
    let entries: serde_json::Value = serde_json::from_str(&stdout_of(assert)).unwrap();
    let indexes: Vec<i64> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["index"].as_i64().unwrap())
        .collect();
    assert_eq!(indexes, vec![2, 5]);
}

#[test]
fn rejection_filter_keeps_rejection_batches_only() {
    let fixture = Fixture::new();
    let dir = fixture.sample_log();

    fixture
        .pit()
        .args(["log", "print", "--rejections-only", "-p"])
        .arg(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("element is already completed"))
        .stdout(predicate::str::contains("\"index\": 3"))
        .stdout(predicate::str::contains("\"index\": 2").not());
}
