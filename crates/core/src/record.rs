// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed model for persisted log entries
//!
//! A replicated log entry is either a raft control marker (configuration or
//! heartbeat, no application payload) or an application batch holding one or
//! more domain records appended atomically. Records are value types: built
//! once per decoded entry, immutable, and discarded after use.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Sentinel for "this record was not triggered by an earlier one".
pub const NO_SOURCE_POSITION: i64 = -1;

/// Number of low bits of a record key that carry the entity-local key.
/// The remaining high bits encode the partition id.
pub const KEY_BITS: u32 = 51;

/// Extract the partition id encoded in the high bits of a record key.
pub fn partition_id(key: i64) -> i32 {
    (key >> KEY_BITS) as i32
}

/// One entry of the replicated log.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PersistedRecord {
    Raft(RaftControlRecord),
    Application(ApplicationBatch),
}

impl PersistedRecord {
    pub fn index(&self) -> i64 {
        match self {
            PersistedRecord::Raft(r) => r.index,
            PersistedRecord::Application(b) => b.index,
        }
    }

    pub fn term(&self) -> i64 {
        match self {
            PersistedRecord::Raft(r) => r.term,
            PersistedRecord::Application(b) => b.term,
        }
    }
}

impl fmt::Display for PersistedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_json(self, f)
    }
}

/// A log entry carrying no application data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaftControlRecord {
    pub index: i64,
    pub term: i64,
}

impl fmt::Display for RaftControlRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_json(self, f)
    }
}

/// A log entry holding domain records written atomically by one append.
///
/// `lowest_position`/`highest_position` bound the sequence numbers of the
/// contained records: every entry position falls inside that inclusive range.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationBatch {
    pub index: i64,
    pub term: i64,
    pub highest_position: i64,
    pub lowest_position: i64,
    pub entries: Vec<DecodedRecord>,
}

impl fmt::Display for ApplicationBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_json(self, f)
    }
}

/// One domain record extracted from an application batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedRecord {
    pub position: i64,
    pub source_record_position: i64,
    pub timestamp: i64,
    pub key: i64,
    pub record_type: RecordType,
    pub value_type: ValueType,
    pub intent: Intent,
    pub rejection_type: RejectionType,
    pub rejection_reason: String,
    pub request_id: u64,
    pub request_stream_id: i32,
    pub protocol_version: u16,
    pub broker_version: BrokerVersion,
    pub record_version: u16,
    pub auth_data: String,
    pub record_value: RecordValue,
    /// Best-effort projection used only by filter predicates and the graph
    /// renderer; not part of the serialized record.
    #[serde(skip)]
    pub process_instance_related: Option<ProcessInstanceRelated>,
}

impl DecodedRecord {
    pub fn partition_id(&self) -> i32 {
        partition_id(self.key)
    }

    pub fn has_source(&self) -> bool {
        self.source_record_position != NO_SOURCE_POSITION
    }
}

impl fmt::Display for DecodedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_json(self, f)
    }
}

/// The decoded value payload of a record.
///
/// Unknown or unparsable payloads degrade to `Opaque` instead of failing the
/// scan: a newer protocol revision must still show up as "something happened
/// at this position".
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// Payload of a known value type, transcoded to a JSON tree.
    Typed(serde_json::Value),
    /// Raw bytes of an unknown or unparsable payload.
    Opaque(Vec<u8>),
}

impl Serialize for RecordValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RecordValue::Typed(value) => value.serialize(serializer),
            RecordValue::Opaque(bytes) => {
                serializer.collect_str(&crate::value::HexBytes(bytes))
            }
        }
    }
}

/// Schema-tolerant partial decode of the value payload, carrying the fields
/// that relate a record to a higher-level process instance. Unknown fields
/// are ignored so that any record shape can be projected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessInstanceRelated {
    pub process_instance_key: Option<i64>,
    pub bpmn_element_type: Option<String>,
    pub process_definition_key: Option<i64>,
}

impl ProcessInstanceRelated {
    /// Project the fields out of a decoded value. Returns `None` when the
    /// value carries none of them.
    pub fn project(value: &serde_json::Value) -> Option<Self> {
        let related: Self = serde_json::from_value(value.clone()).ok()?;
        if related == Self::default() {
            None
        } else {
            Some(related)
        }
    }
}

/// Broker release that wrote a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BrokerVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl BrokerVersion {
    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for BrokerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Serialize for BrokerVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

macro_rules! closed_enum {
    (
        $(#[$doc:meta])*
        $name:ident($repr:ty) {
            $($variant:ident = $ordinal:literal => $label:literal,)*
        }
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)*
            /// Forward-compatibility escape hatch: an ordinal this reader
            /// does not know yet.
            Unknown($repr),
        }

        impl $name {
            pub fn from_ordinal(ordinal: $repr) -> Self {
                match ordinal {
                    $($ordinal => $name::$variant,)*
                    other => $name::Unknown(other),
                }
            }

            pub fn ordinal(&self) -> $repr {
                match self {
                    $($name::$variant => $ordinal,)*
                    $name::Unknown(other) => *other,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $($name::$variant => f.write_str($label),)*
                    $name::Unknown(other) => write!(f, "UNKNOWN({})", other),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }
    };
}

closed_enum! {
    /// Whether a record is a command, an event, or the rejection of a
    /// command.
    RecordType(u8) {
        Command = 0 => "COMMAND",
        Event = 1 => "EVENT",
        CommandRejection = 2 => "COMMAND_REJECTION",
    }
}

closed_enum! {
    /// Domain schema tag of a record's value payload.
    ValueType(u8) {
        Job = 0 => "JOB",
        Deployment = 1 => "DEPLOYMENT",
        ProcessInstance = 2 => "PROCESS_INSTANCE",
        Incident = 3 => "INCIDENT",
        Message = 4 => "MESSAGE",
        MessageSubscription = 5 => "MESSAGE_SUBSCRIPTION",
        ProcessMessageSubscription = 6 => "PROCESS_MESSAGE_SUBSCRIPTION",
        JobBatch = 7 => "JOB_BATCH",
        Timer = 8 => "TIMER",
        Variable = 9 => "VARIABLE",
        VariableDocument = 10 => "VARIABLE_DOCUMENT",
        ProcessInstanceCreation = 11 => "PROCESS_INSTANCE_CREATION",
        Error = 12 => "ERROR",
        Process = 13 => "PROCESS",
        ProcessEvent = 14 => "PROCESS_EVENT",
        Signal = 15 => "SIGNAL",
        SignalSubscription = 16 => "SIGNAL_SUBSCRIPTION",
    }
}

closed_enum! {
    /// Domain action tag of a record.
    Intent(u16) {
        Create = 0 => "CREATE",
        Created = 1 => "CREATED",
        ActivateElement = 2 => "ACTIVATE_ELEMENT",
        ElementActivating = 3 => "ELEMENT_ACTIVATING",
        ElementActivated = 4 => "ELEMENT_ACTIVATED",
        ElementCompleting = 5 => "ELEMENT_COMPLETING",
        ElementCompleted = 6 => "ELEMENT_COMPLETED",
        ElementTerminating = 7 => "ELEMENT_TERMINATING",
        ElementTerminated = 8 => "ELEMENT_TERMINATED",
        SequenceFlowTaken = 9 => "SEQUENCE_FLOW_TAKEN",
        Complete = 10 => "COMPLETE",
        Completed = 11 => "COMPLETED",
        Fail = 12 => "FAIL",
        Failed = 13 => "FAILED",
        TimedOut = 14 => "TIMED_OUT",
        Resolve = 15 => "RESOLVE",
        Resolved = 16 => "RESOLVED",
        Cancel = 17 => "CANCEL",
        Canceled = 18 => "CANCELED",
        Expired = 19 => "EXPIRED",
    }
}

closed_enum! {
    /// Why a command was rejected. `NullVal` for non-rejection records.
    RejectionType(u8) {
        NullVal = 0 => "NULL_VAL",
        InvalidArgument = 1 => "INVALID_ARGUMENT",
        NotFound = 2 => "NOT_FOUND",
        AlreadyExists = 3 => "ALREADY_EXISTS",
        InvalidState = 4 => "INVALID_STATE",
        ProcessingError = 5 => "PROCESSING_ERROR",
        ExceededBatchRecordSize = 6 => "EXCEEDED_BATCH_RECORD_SIZE",
    }
}

fn write_json<T: Serialize>(value: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match serde_json::to_string(value) {
        Ok(json) => f.write_str(&json),
        Err(_) => Err(fmt::Error),
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
