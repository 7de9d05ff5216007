//! Top-level CLI behavior specs

use crate::prelude::*;
use predicates::prelude::*;

#[test]
fn help_lists_the_inspection_areas() {
    Fixture::new()
        .pit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("log"))
        .stdout(predicate::str::contains("state"));
}

#[test]
fn log_search_requires_a_position_or_index() {
    let fixture = Fixture::new();
    fixture
        .pit()
        .args(["log", "search", "-p"])
        .arg(fixture.sample_log())
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn unknown_column_family_name_is_rejected_at_parse_time() {
    let fixture = Fixture::new();
    fixture
        .pit()
        .args(["state", "list", "--column-family", "bogus", "-p"])
        .arg(fixture.path("runtime"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown column family name 'bogus'"));
}
