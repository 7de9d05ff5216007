//! State statistics specs

use crate::prelude::*;
use predicates::prelude::*;

#[test]
fn counts_keys_per_family() {
    let fixture = Fixture::new();
    let dir = fixture.sample_state();

    fixture
        .pit()
        .args(["state", "statistics", "-p"])
        .arg(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"JOBS\": 2"))
        .stdout(predicate::str::contains("\"VARIABLES\": 1"))
        .stdout(predicate::str::contains("\"INCIDENTS\": 1"))
        .stdout(predicate::str::contains("TIMERS").not());
}
