//! Log search specs

use crate::prelude::*;
use predicates::prelude::*;

#[test]
fn finds_a_record_by_position() {
    let fixture = Fixture::new();
    let dir = fixture.sample_log();

    fixture
        .pit()
        .args(["log", "search", "--position", "102", "-p"])
        .arg(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"position\": 102"))
        .stdout(predicate::str::contains("element is already completed"));
}

#[test]
fn absent_position_reports_no_record() {
    let fixture = Fixture::new();
    let dir = fixture.sample_log();

    fixture
        .pit()
        .args(["log", "search", "--position", "150", "-p"])
        .arg(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No record found at position 150"));
}

#[test]
fn finds_an_entry_by_index() {
    let fixture = Fixture::new();
    let dir = fixture.sample_log();

    fixture
        .pit()
        .args(["log", "search", "--index", "2", "-p"])
        .arg(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"lowestPosition\": 100"))
        .stdout(predicate::str::contains("\"highestPosition\": 101"));
}

#[test]
fn absent_index_reports_no_entry() {
    let fixture = Fixture::new();
    let dir = fixture.sample_log();

    fixture
        .pit()
        .args(["log", "search", "--index", "42", "-p"])
        .arg(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No entry found at index 42"));
}
