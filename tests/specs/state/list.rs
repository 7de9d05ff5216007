//! State list specs

use crate::prelude::*;
use predicates::prelude::*;

#[test]
fn lists_every_entry_with_its_family() {
    let fixture = Fixture::new();
    let dir = fixture.sample_state();

    let assert = fixture
        .pit()
        .args(["state", "list", "-p"])
        .arg(&dir)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    let entries: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 4);
    // families come out in ordinal order: VARIABLES < JOBS < INCIDENTS
    assert_eq!(entries[0]["columnFamily"], "VARIABLES");
    assert_eq!(entries[1]["columnFamily"], "JOBS");
    assert_eq!(entries[1]["key"], "0000000000000001");
    assert_eq!(entries[1]["value"]["retries"], 3);
    // undecodable payload degrades to its hex string
    assert_eq!(entries[3]["value"], "dead");
}

#[test]
fn restricts_to_one_family() {
    let fixture = Fixture::new();
    let dir = fixture.sample_state();

    fixture
        .pit()
        .args(["state", "list", "--column-family", "variables", "-p"])
        .arg(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("total"))
        .stdout(predicate::str::contains("retries").not());
}

#[test]
fn text_format_prints_one_line_per_entry() {
    let fixture = Fixture::new();
    let dir = fixture.sample_state();

    let assert = fixture
        .pit()
        .args(["state", "list", "--format", "text", "-p"])
        .arg(&dir)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert_eq!(stdout.lines().count(), 4);
}

#[test]
fn missing_store_fails_as_not_found() {
    let fixture = Fixture::new();
    fixture
        .pit()
        .args(["state", "list", "-p"])
        .arg(fixture.path("runtime"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("state store not found"));
}
