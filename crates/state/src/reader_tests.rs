// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use tempfile::TempDir;

/// Build a store with a few entries across families, then drop the writable
/// handle so it can be reopened read-only.
fn fixture_store(dir: &Path) {
    let mut options = Options::default();
    options.create_if_missing(true);
    options.set_prefix_extractor(SliceTransform::create_fixed_prefix(KEY_PREFIX_LEN));
    let db = DBWithThreadMode::<MultiThreaded>::open(&options, dir).unwrap();

    let put = |family: ColumnFamily, key: i64, value: &[u8]| {
        db.put(family.composite_key(key), value).unwrap();
    };
    put(ColumnFamily::Jobs, 1, br#"{"retries": 3}"#);
    put(ColumnFamily::Jobs, 2, br#"{"retries": 1}"#);
    put(
        ColumnFamily::Variables,
        10,
        br#"{"name": "total", "value": 99}"#,
    );
    put(ColumnFamily::Incidents, 20, &[0xde, 0xad]);
}

fn open_fixture(tmp: &TempDir) -> StateReader {
    let dir = tmp.path().join("runtime");
    fixture_store(&dir);
    StateReader::open(&dir).unwrap()
}

#[test]
fn missing_store_is_store_not_found() {
    let tmp = TempDir::new().unwrap();
    let err = StateReader::open(&tmp.path().join("runtime")).unwrap_err();
    assert!(matches!(err, StateError::StoreNotFound { .. }), "{err}");
}

#[test]
fn empty_directory_is_store_not_found() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("runtime");
    std::fs::create_dir(&dir).unwrap();
    let err = StateReader::open(&dir).unwrap_err();
    assert!(matches!(err, StateError::StoreNotFound { .. }), "{err}");
}

#[test]
fn visits_all_entries_in_family_order() {
    let tmp = TempDir::new().unwrap();
    let reader = open_fixture(&tmp);

    let mut seen = Vec::new();
    reader
        .visit_all(|family, key, _| {
            seen.push((family, key.to_vec()));
        })
        .unwrap();

    assert_eq!(
        seen,
        vec![
            (ColumnFamily::Variables, 10i64.to_be_bytes().to_vec()),
            (ColumnFamily::Jobs, 1i64.to_be_bytes().to_vec()),
            (ColumnFamily::Jobs, 2i64.to_be_bytes().to_vec()),
            (ColumnFamily::Incidents, 20i64.to_be_bytes().to_vec()),
        ]
    );
}

#[test]
fn visits_one_family_and_stops_at_its_end() {
    let tmp = TempDir::new().unwrap();
    let reader = open_fixture(&tmp);

    let mut count = 0;
    reader
        .visit_family(ColumnFamily::Jobs, |_, value| {
            count += 1;
            assert!(value.starts_with(b"{"));
        })
        .unwrap();
    assert_eq!(count, 2);

    let mut empty = 0;
    reader
        .visit_family(ColumnFamily::Timers, |_, _| empty += 1)
        .unwrap();
    assert_eq!(empty, 0);
}

#[test]
fn point_lookup_finds_present_keys_and_skips_absent_ones() {
    let tmp = TempDir::new().unwrap();
    let reader = open_fixture(&tmp);

    let raw = reader.get_value(ColumnFamily::Jobs, 1).unwrap().unwrap();
    assert_eq!(raw, br#"{"retries": 3}"#);
    assert!(reader.get_value(ColumnFamily::Jobs, 42).unwrap().is_none());
}

#[test]
fn value_as_json_degrades_gracefully() {
    let tmp = TempDir::new().unwrap();
    let reader = open_fixture(&tmp);

    assert_eq!(
        reader.value_as_json(ColumnFamily::Jobs, 1).unwrap(),
        json!({"retries": 3})
    );
    // unparsable payload becomes its hex string
    assert_eq!(
        reader.value_as_json(ColumnFamily::Incidents, 20).unwrap(),
        json!("dead")
    );
    // absent key becomes an empty object
    assert_eq!(
        reader.value_as_json(ColumnFamily::Jobs, 42).unwrap(),
        json!({})
    );
}

#[test]
fn lists_entries_with_decoded_values() {
    let tmp = TempDir::new().unwrap();
    let reader = open_fixture(&tmp);

    let entries = reader.list(Some(ColumnFamily::Variables)).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].column_family, ColumnFamily::Variables);
    assert_eq!(entries[0].key, "000000000000000a");
    assert_eq!(entries[0].value, json!({"name": "total", "value": 99}));

    let all = reader.list(None).unwrap();
    assert_eq!(all.len(), 4);
}

#[test]
fn statistics_count_keys_per_family() {
    let tmp = TempDir::new().unwrap();
    let reader = open_fixture(&tmp);

    let stats = reader.statistics().unwrap();
    assert_eq!(stats.get(&ColumnFamily::Jobs), Some(&2));
    assert_eq!(stats.get(&ColumnFamily::Variables), Some(&1));
    assert_eq!(stats.get(&ColumnFamily::Incidents), Some(&1));
    assert_eq!(stats.get(&ColumnFamily::Timers), None);
}

#[test]
fn unknown_family_ordinal_aborts_the_scan() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("runtime");
    {
        let mut options = Options::default();
        options.create_if_missing(true);
        let db = DBWithThreadMode::<MultiThreaded>::open(&options, &dir).unwrap();
        db.put(999u64.to_be_bytes(), b"{}").unwrap();
    }

    let reader = StateReader::open(&dir).unwrap();
    let err = reader.visit_all(|_, _, _| {}).unwrap_err();
    assert!(
        matches!(
            err,
            StateError::ColumnFamily(ColumnFamilyError::UnknownColumnFamily { ordinal: 999 })
        ),
        "{err}"
    );
}
