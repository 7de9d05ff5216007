// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Keyspace demultiplexer for the embedded state store
//!
//! The engine multiplexes logical column families into one physical ordered
//! keyspace: every key starts with a fixed-width ordinal identifying its
//! family. The ordinal is stored big-endian so that families sort
//! numerically under the store's bytewise comparator.
//!
//! The family set is a closed enumeration generated from the engine schema
//! this reader understands. An out-of-range ordinal is a hard decode error
//! in every reader here: it indicates corruption or a newer store format,
//! and must never be skipped silently.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Width of the column-family discriminator prefix on every state key.
pub const KEY_PREFIX_LEN: usize = 8;

/// Errors from decoding the column-family prefix of a raw key.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColumnFamilyError {
    #[error("state key too short: {len} bytes, need at least {KEY_PREFIX_LEN}")]
    TruncatedKey { len: usize },
    #[error("unknown column family ordinal {ordinal}")]
    UnknownColumnFamily { ordinal: u64 },
    #[error("unknown column family name '{name}'")]
    UnknownName { name: String },
}

macro_rules! column_families {
    ($($variant:ident = $ordinal:literal => $label:literal,)*) => {
        /// Logical partition of the physical keyspace.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ColumnFamily {
            $($variant,)*
        }

        impl ColumnFamily {
            /// Every known family, in ordinal order.
            pub const ALL: &'static [ColumnFamily] = &[$(ColumnFamily::$variant,)*];

            pub fn from_ordinal(ordinal: u64) -> Result<Self, ColumnFamilyError> {
                match ordinal {
                    $($ordinal => Ok(ColumnFamily::$variant),)*
                    other => Err(ColumnFamilyError::UnknownColumnFamily { ordinal: other }),
                }
            }

            pub fn ordinal(&self) -> u64 {
                match self {
                    $(ColumnFamily::$variant => $ordinal,)*
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $(ColumnFamily::$variant => $label,)*
                }
            }
        }

        impl FromStr for ColumnFamily {
            type Err = ColumnFamilyError;

            fn from_str(name: &str) -> Result<Self, Self::Err> {
                let upper = name.to_ascii_uppercase();
                match upper.as_str() {
                    $($label => Ok(ColumnFamily::$variant),)*
                    _ => Err(ColumnFamilyError::UnknownName {
                        name: name.to_string(),
                    }),
                }
            }
        }
    };
}

column_families! {
    Default = 0 => "DEFAULT",
    Key = 1 => "KEY",
    Process = 2 => "PROCESS",
    ProcessVersion = 3 => "PROCESS_VERSION",
    ProcessCacheById = 4 => "PROCESS_CACHE_BY_ID",
    ElementInstanceKey = 5 => "ELEMENT_INSTANCE_KEY",
    ElementInstanceParentChild = 6 => "ELEMENT_INSTANCE_PARENT_CHILD",
    TakenSequenceFlows = 7 => "TAKEN_SEQUENCE_FLOWS",
    Variables = 8 => "VARIABLES",
    TemporaryVariableStore = 9 => "TEMPORARY_VARIABLE_STORE",
    Timers = 10 => "TIMERS",
    TimerDueDates = 11 => "TIMER_DUE_DATES",
    Jobs = 12 => "JOBS",
    JobDeadlines = 13 => "JOB_DEADLINES",
    JobActivatable = 14 => "JOB_ACTIVATABLE",
    Message = 15 => "MESSAGE",
    MessageDeadlines = 16 => "MESSAGE_DEADLINES",
    MessageIds = 17 => "MESSAGE_IDS",
    MessageCorrelated = 18 => "MESSAGE_CORRELATED",
    MessageSubscriptionByKey = 19 => "MESSAGE_SUBSCRIPTION_BY_KEY",
    Incidents = 20 => "INCIDENTS",
    IncidentProcessInstances = 21 => "INCIDENT_PROCESS_INSTANCES",
    IncidentJobs = 22 => "INCIDENT_JOBS",
    BannedInstance = 23 => "BANNED_INSTANCE",
    ExporterPosition = 24 => "EXPORTER_POSITION",
}

impl ColumnFamily {
    /// Decode the family discriminator from the first bytes of a raw key.
    pub fn decode(key: &[u8]) -> Result<Self, ColumnFamilyError> {
        if key.len() < KEY_PREFIX_LEN {
            return Err(ColumnFamilyError::TruncatedKey { len: key.len() });
        }
        let mut prefix = [0u8; KEY_PREFIX_LEN];
        prefix.copy_from_slice(&key[..KEY_PREFIX_LEN]);
        Self::from_ordinal(u64::from_be_bytes(prefix))
    }

    /// The fixed-width key prefix of this family.
    pub fn prefix(&self) -> [u8; KEY_PREFIX_LEN] {
        self.ordinal().to_be_bytes()
    }

    /// Composite key for a point lookup: family prefix followed by the
    /// entity's own encoded key.
    pub fn composite_key(&self, key: i64) -> [u8; 2 * KEY_PREFIX_LEN] {
        let mut composite = [0u8; 2 * KEY_PREFIX_LEN];
        composite[..KEY_PREFIX_LEN].copy_from_slice(&self.prefix());
        composite[KEY_PREFIX_LEN..].copy_from_slice(&key.to_be_bytes());
        composite
    }
}

impl fmt::Display for ColumnFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ColumnFamily {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
#[path = "column_family_tests.rs"]
mod tests;
