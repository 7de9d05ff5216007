//! State point-lookup specs

use crate::prelude::*;
use predicates::prelude::*;

#[test]
fn gets_a_value_by_family_and_key() {
    let fixture = Fixture::new();
    let dir = fixture.sample_state();

    fixture
        .pit()
        .args(["state", "get", "--column-family", "jobs", "--key", "1", "-p"])
        .arg(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"worker\": \"shipper\""));
}

#[test]
fn absent_key_prints_an_empty_object() {
    let fixture = Fixture::new();
    let dir = fixture.sample_state();

    let assert = fixture
        .pit()
        .args(["state", "get", "--column-family", "jobs", "--key", "42", "-p"])
        .arg(&dir)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert_eq!(stdout.trim(), "{}");
}
