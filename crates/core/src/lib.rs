// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! pit-core: Record model and decoders for the Partition Inspection Tool
//!
//! This crate provides:
//! - The typed record model for persisted replicated-log entries
//! - The framed record decoder, resolving metadata layout versions
//! - The column-family keyspace demultiplexer
//! - Tolerant value-to-JSON transcoding
//!
//! Everything here is pure: no I/O, no shared state. Byte buffers come in,
//! typed records come out.

pub mod column_family;
pub mod frame;
pub mod record;
pub mod value;

pub use column_family::{ColumnFamily, ColumnFamilyError, KEY_PREFIX_LEN};
pub use frame::{BatchEntryDecoder, MalformedRecordError, CURRENT_LAYOUT_VERSION};
pub use record::{
    partition_id, ApplicationBatch, BrokerVersion, DecodedRecord, Intent, PersistedRecord,
    ProcessInstanceRelated, RaftControlRecord, RecordType, RecordValue, RejectionType, ValueType,
    NO_SOURCE_POSITION,
};
