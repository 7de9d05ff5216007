// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only reader over the engine's RocksDB state store
//!
//! The store multiplexes all column families into the default physical
//! family; [`ColumnFamily`] demultiplexes them from the 8-byte key prefix.
//! The store is opened read-only and supports multiple independent readers
//! against the same path. Iteration is streaming: the visitor sees one
//! key/value pair at a time and nothing is materialized unless asked for.

use pit_core::column_family::{ColumnFamily, ColumnFamilyError, KEY_PREFIX_LEN};
use pit_core::value::{transcode_lossy, HexBytes};
use rocksdb::{DBWithThreadMode, Direction, IteratorMode, MultiThreaded, Options, SliceTransform};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors from opening and scanning the state store.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("state store not found: {path}")]
    StoreNotFound { path: PathBuf },
    #[error(transparent)]
    ColumnFamily(#[from] ColumnFamilyError),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<rocksdb::Error> for StateError {
    fn from(err: rocksdb::Error) -> Self {
        StateError::Storage(err.to_string())
    }
}

/// One decoded key/value pair from the store.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateEntry {
    pub column_family: ColumnFamily,
    /// Hex of the key bytes after the family prefix.
    pub key: String,
    pub value: Value,
}

impl std::fmt::Display for StateEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(std::fmt::Error),
        }
    }
}

/// Read-only handle over one partition's state store.
#[derive(Debug)]
pub struct StateReader {
    db: DBWithThreadMode<MultiThreaded>,
}

impl StateReader {
    /// Open the store at `path` read-only. A missing or uninitialized store
    /// is [`StateError::StoreNotFound`], not a storage failure.
    pub fn open(path: &Path) -> Result<Self, StateError> {
        if !path.is_dir() {
            return Err(StateError::StoreNotFound {
                path: path.to_path_buf(),
            });
        }
        let mut options = Options::default();
        options.create_if_missing(false);
        options.set_prefix_extractor(SliceTransform::create_fixed_prefix(KEY_PREFIX_LEN));

        let db = DBWithThreadMode::<MultiThreaded>::open_for_read_only(&options, path, false)
            .map_err(|err| {
                let message = err.to_string();
                if message.contains("No such file") || message.contains("does not exist") {
                    StateError::StoreNotFound {
                        path: path.to_path_buf(),
                    }
                } else {
                    StateError::Storage(message)
                }
            })?;
        debug!(path = %path.display(), "opened state store read-only");
        Ok(Self { db })
    }

    /// Visit every key/value pair in the store, in key order.
    ///
    /// An unknown family ordinal aborts the scan: it indicates corruption or
    /// a newer store format and is never skipped silently.
    pub fn visit_all(
        &self,
        mut visit: impl FnMut(ColumnFamily, &[u8], &[u8]),
    ) -> Result<(), StateError> {
        for pair in self.db.iterator(IteratorMode::Start) {
            let (key, value) = pair?;
            let family = ColumnFamily::decode(&key)?;
            visit(family, &key[KEY_PREFIX_LEN..], &value);
        }
        Ok(())
    }

    /// Visit the key/value pairs of one family, in key order.
    pub fn visit_family(
        &self,
        family: ColumnFamily,
        mut visit: impl FnMut(&[u8], &[u8]),
    ) -> Result<(), StateError> {
        let prefix = family.prefix();
        let iter = self
            .db
            .iterator(IteratorMode::From(prefix.as_slice(), Direction::Forward));
        for pair in iter {
            let (key, value) = pair?;
            if ColumnFamily::decode(&key)? != family {
                break;
            }
            visit(&key[KEY_PREFIX_LEN..], &value);
        }
        Ok(())
    }

    /// Point lookup by family and entity key. Absence is not an error.
    pub fn get_value(&self, family: ColumnFamily, key: i64) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.db.get(family.composite_key(key))?)
    }

    /// Point lookup decoded to JSON; an absent key yields an empty object so
    /// callers can always print something.
    pub fn value_as_json(&self, family: ColumnFamily, key: i64) -> Result<Value, StateError> {
        Ok(self
            .get_value(family, key)?
            .map(|raw| transcode_lossy(&raw))
            .unwrap_or_else(|| Value::Object(Default::default())))
    }

    /// Materialize decoded entries, optionally restricted to one family.
    pub fn list(&self, family: Option<ColumnFamily>) -> Result<Vec<StateEntry>, StateError> {
        let mut entries = Vec::new();
        let mut collect = |family: ColumnFamily, key: &[u8], value: &[u8]| {
            entries.push(StateEntry {
                column_family: family,
                key: HexBytes(key).to_string(),
                value: transcode_lossy(value),
            });
        };
        match family {
            Some(family) => self.visit_family(family, |key, value| collect(family, key, value))?,
            None => self.visit_all(&mut collect)?,
        }
        Ok(entries)
    }

    /// Count keys per family in one pass over the store.
    pub fn statistics(&self) -> Result<BTreeMap<ColumnFamily, u64>, StateError> {
        let mut counts = BTreeMap::new();
        self.visit_all(|family, _, _| {
            *counts.entry(family).or_insert(0u64) += 1;
        })?;
        Ok(counts)
    }
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
