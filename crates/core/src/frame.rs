// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Framed record decoder for application batch buffers
//!
//! An application batch's data buffer is a front-to-back concatenation of
//! record frames, each little-endian:
//!
//! ```text
//! u32 frame_length          entire frame, >= 40 + metadata_length
//! u32 metadata_length
//! i64 position
//! i64 source_record_position
//! i64 timestamp
//! i64 key
//! [metadata_length bytes]   record metadata (two layouts, see below)
//! [remaining bytes]         value payload
//! ```
//!
//! The metadata layout changed at protocol version 4: the current layout
//! carries `record_version` and multi-tenancy authorization data, the legacy
//! layout does not. `protocol_version` sits at offset 0 of the metadata in
//! both layouts so the decoder can dispatch on it, re-reading the same bytes
//! with the matching layout. Legacy records decode with `record_version = 0`
//! and `auth_data = ""`.
//!
//! Decoding one batch consumes exactly the buffer: the sum of frame lengths
//! equals the buffer capacity. A zero, too-small, or past-the-end frame
//! length is a [`MalformedRecordError`], fatal for the containing batch but
//! not for the rest of the log.

use crate::record::{
    BrokerVersion, DecodedRecord, Intent, ProcessInstanceRelated, RecordType, RecordValue,
    RejectionType, ValueType,
};
use crate::value;
use thiserror::Error;
use tracing::debug;

/// First protocol version using the current metadata layout.
pub const CURRENT_LAYOUT_VERSION: u16 = 4;

/// Fixed portion of a record frame preceding the metadata bytes.
pub const RECORD_HEADER_LEN: usize = 40;

/// A record frame that cannot be decoded. Fatal for the containing batch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed record frame at offset {offset} (buffer is {buffer_len} bytes): {reason}")]
pub struct MalformedRecordError {
    pub offset: usize,
    pub buffer_len: usize,
    pub reason: String,
}

/// Fully decoded record metadata, shared by both layouts.
#[derive(Debug, Clone, PartialEq)]
struct RecordMetadata {
    protocol_version: u16,
    intent: Intent,
    record_type: RecordType,
    value_type: ValueType,
    rejection_type: RejectionType,
    broker_version: BrokerVersion,
    record_version: u16,
    request_id: u64,
    request_stream_id: i32,
    rejection_reason: String,
    auth_data: String,
}

/// Lazy one-pass decoder over one batch buffer.
///
/// Yields records front-to-back; after the first error the sequence ends.
pub struct BatchEntryDecoder<'a> {
    buf: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> BatchEntryDecoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            offset: 0,
            failed: false,
        }
    }

    fn malformed(&self, at: usize, reason: impl Into<String>) -> MalformedRecordError {
        MalformedRecordError {
            offset: at,
            buffer_len: self.buf.len(),
            reason: reason.into(),
        }
    }

    fn decode_next(&mut self) -> Result<DecodedRecord, MalformedRecordError> {
        let start = self.offset;
        let mut cursor = Cursor::new(self.buf, start);

        let frame_length = cursor.read_u32()? as usize;
        let metadata_length = cursor.read_u32()? as usize;
        if frame_length == 0 {
            return Err(self.malformed(start, "zero frame length"));
        }
        if frame_length < RECORD_HEADER_LEN + metadata_length {
            return Err(self.malformed(
                start,
                format!(
                    "frame length {} smaller than headers ({} + {} bytes of metadata)",
                    frame_length, RECORD_HEADER_LEN, metadata_length
                ),
            ));
        }
        if start + frame_length > self.buf.len() {
            return Err(self.malformed(
                start,
                format!("frame of {} bytes reads past the buffer end", frame_length),
            ));
        }

        let position = cursor.read_i64()?;
        let source_record_position = cursor.read_i64()?;
        let timestamp = cursor.read_i64()?;
        let key = cursor.read_i64()?;

        let metadata_bytes = cursor.read_bytes(metadata_length)?;
        let metadata = decode_metadata(metadata_bytes, start + RECORD_HEADER_LEN, self.buf.len())?;

        let value_len = frame_length - RECORD_HEADER_LEN - metadata_length;
        let value_bytes = cursor.read_bytes(value_len)?;

        let record_value = match metadata.value_type {
            ValueType::Unknown(_) => RecordValue::Opaque(value_bytes.to_vec()),
            _ => match value::try_transcode(value_bytes) {
                Some(json) => RecordValue::Typed(json),
                None => RecordValue::Opaque(value_bytes.to_vec()),
            },
        };
        let process_instance_related = match &record_value {
            RecordValue::Typed(json) => ProcessInstanceRelated::project(json),
            RecordValue::Opaque(_) => None,
        };

        if source_record_position > position {
            // Observed but not enforced: the engine is not known to write
            // forward references.
            debug!(
                position,
                source_record_position, "record references a later source position"
            );
        }

        self.offset = start + frame_length;

        Ok(DecodedRecord {
            position,
            source_record_position,
            timestamp,
            key,
            record_type: metadata.record_type,
            value_type: metadata.value_type,
            intent: metadata.intent,
            rejection_type: metadata.rejection_type,
            rejection_reason: metadata.rejection_reason,
            request_id: metadata.request_id,
            request_stream_id: metadata.request_stream_id,
            protocol_version: metadata.protocol_version,
            broker_version: metadata.broker_version,
            record_version: metadata.record_version,
            auth_data: metadata.auth_data,
            record_value,
            process_instance_related,
        })
    }
}

impl Iterator for BatchEntryDecoder<'_> {
    type Item = Result<DecodedRecord, MalformedRecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.buf.len() {
            return None;
        }
        match self.decode_next() {
            Ok(record) => Some(Ok(record)),
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

/// Decode record metadata, dispatching on the protocol version at offset 0.
///
/// The version field lives at the same offset in both layouts. When the
/// guard selects the legacy layout, the same bytes are re-read with the
/// legacy field set and the missing fields defaulted.
fn decode_metadata(
    bytes: &[u8],
    base: usize,
    buffer_len: usize,
) -> Result<RecordMetadata, MalformedRecordError> {
    let mut peek = Cursor {
        buf: bytes,
        pos: 0,
        base,
        buffer_len,
    };
    let protocol_version = peek.read_u16()?;
    if protocol_version >= CURRENT_LAYOUT_VERSION {
        decode_metadata_current(bytes, base, buffer_len)
    } else {
        decode_metadata_legacy(bytes, base, buffer_len)
    }
}

fn decode_metadata_current(
    bytes: &[u8],
    base: usize,
    buffer_len: usize,
) -> Result<RecordMetadata, MalformedRecordError> {
    let mut cursor = Cursor {
        buf: bytes,
        pos: 0,
        base,
        buffer_len,
    };
    Ok(RecordMetadata {
        protocol_version: cursor.read_u16()?,
        intent: Intent::from_ordinal(cursor.read_u16()?),
        record_type: RecordType::from_ordinal(cursor.read_u8()?),
        value_type: ValueType::from_ordinal(cursor.read_u8()?),
        rejection_type: RejectionType::from_ordinal(cursor.read_u8()?),
        broker_version: BrokerVersion::new(
            cursor.read_u8()?,
            cursor.read_u8()?,
            cursor.read_u8()?,
        ),
        record_version: cursor.read_u16()?,
        request_id: cursor.read_u64()?,
        request_stream_id: cursor.read_i32()?,
        rejection_reason: cursor.read_string()?,
        auth_data: cursor.read_string()?,
    })
}

fn decode_metadata_legacy(
    bytes: &[u8],
    base: usize,
    buffer_len: usize,
) -> Result<RecordMetadata, MalformedRecordError> {
    let mut cursor = Cursor {
        buf: bytes,
        pos: 0,
        base,
        buffer_len,
    };
    Ok(RecordMetadata {
        protocol_version: cursor.read_u16()?,
        intent: Intent::from_ordinal(cursor.read_u16()?),
        record_type: RecordType::from_ordinal(cursor.read_u8()?),
        value_type: ValueType::from_ordinal(cursor.read_u8()?),
        rejection_type: RejectionType::from_ordinal(cursor.read_u8()?),
        broker_version: BrokerVersion::new(
            cursor.read_u8()?,
            cursor.read_u8()?,
            cursor.read_u8()?,
        ),
        record_version: 0,
        request_id: cursor.read_u64()?,
        request_stream_id: cursor.read_i32()?,
        rejection_reason: cursor.read_string()?,
        auth_data: String::new(),
    })
}

/// Bounded little-endian reader with absolute offsets in error context.
struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
    base: usize,
    buffer_len: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8], pos: usize) -> Self {
        Self {
            buf,
            pos,
            base: 0,
            buffer_len: buf.len(),
        }
    }

    fn truncated(&self, needed: usize) -> MalformedRecordError {
        MalformedRecordError {
            offset: self.base + self.pos,
            buffer_len: self.buffer_len,
            reason: format!("truncated: {} more bytes needed", needed),
        }
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], MalformedRecordError> {
        if self.pos + len > self.buf.len() {
            return Err(self.truncated(self.pos + len - self.buf.len()));
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn read_u8(&mut self) -> Result<u8, MalformedRecordError> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_u16(&mut self) -> Result<u16, MalformedRecordError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn read_u32(&mut self) -> Result<u32, MalformedRecordError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_i32(&mut self) -> Result<i32, MalformedRecordError> {
        Ok(self.read_u32()? as i32)
    }

    fn read_u64(&mut self) -> Result<u64, MalformedRecordError> {
        let bytes = self.read_bytes(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(raw))
    }

    fn read_i64(&mut self) -> Result<i64, MalformedRecordError> {
        Ok(self.read_u64()? as i64)
    }

    fn read_string(&mut self) -> Result<String, MalformedRecordError> {
        let len = self.read_u32()? as usize;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Encode one record frame using the current metadata layout. The inverse of
/// the decoder, used to build fixtures; the inspection tool itself never
/// writes artifacts.
pub fn encode_record(buf: &mut Vec<u8>, record: &DecodedRecord) {
    encode(buf, record, record.protocol_version.max(CURRENT_LAYOUT_VERSION))
}

/// Encode one record frame using the legacy metadata layout (no record
/// version, no authorization data).
pub fn encode_record_legacy(buf: &mut Vec<u8>, record: &DecodedRecord) {
    encode(
        buf,
        record,
        record.protocol_version.min(CURRENT_LAYOUT_VERSION - 1),
    )
}

fn encode(buf: &mut Vec<u8>, record: &DecodedRecord, protocol_version: u16) {
    let current = protocol_version >= CURRENT_LAYOUT_VERSION;

    let mut metadata = Vec::new();
    metadata.extend_from_slice(&protocol_version.to_le_bytes());
    metadata.extend_from_slice(&record.intent.ordinal().to_le_bytes());
    metadata.push(record.record_type.ordinal());
    metadata.push(record.value_type.ordinal());
    metadata.push(record.rejection_type.ordinal());
    metadata.push(record.broker_version.major);
    metadata.push(record.broker_version.minor);
    metadata.push(record.broker_version.patch);
    if current {
        metadata.extend_from_slice(&record.record_version.to_le_bytes());
    }
    metadata.extend_from_slice(&record.request_id.to_le_bytes());
    metadata.extend_from_slice(&record.request_stream_id.to_le_bytes());
    encode_string(&mut metadata, &record.rejection_reason);
    if current {
        encode_string(&mut metadata, &record.auth_data);
    }

    let value_bytes = match &record.record_value {
        RecordValue::Typed(json) => serde_json::to_vec(json).unwrap_or_default(),
        RecordValue::Opaque(bytes) => bytes.clone(),
    };

    let frame_length = RECORD_HEADER_LEN + metadata.len() + value_bytes.len();
    buf.extend_from_slice(&(frame_length as u32).to_le_bytes());
    buf.extend_from_slice(&(metadata.len() as u32).to_le_bytes());
    buf.extend_from_slice(&record.position.to_le_bytes());
    buf.extend_from_slice(&record.source_record_position.to_le_bytes());
    buf.extend_from_slice(&record.timestamp.to_le_bytes());
    buf.extend_from_slice(&record.key.to_le_bytes());
    buf.extend_from_slice(&metadata);
    buf.extend_from_slice(&value_bytes);
}

fn encode_string(buf: &mut Vec<u8>, text: &str) {
    buf.extend_from_slice(&(text.len() as u32).to_le_bytes());
    buf.extend_from_slice(text.as_bytes());
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
