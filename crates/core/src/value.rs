// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tolerant transcoding of raw value payloads to JSON
//!
//! The engine stores record and state values as schema-less JSON documents.
//! The transcoder never fails: payloads that do not parse degrade to a hex
//! string so that a debugging session can still see the bytes.

use serde_json::Value;
use std::fmt;

/// Try to transcode a raw payload to a JSON tree. `None` when the payload is
/// not valid JSON.
pub fn try_transcode(raw: &[u8]) -> Option<Value> {
    serde_json::from_slice(raw).ok()
}

/// Transcode a raw payload, degrading unparsable bytes to a hex string.
pub fn transcode_lossy(raw: &[u8]) -> Value {
    try_transcode(raw).unwrap_or_else(|| Value::String(HexBytes(raw).to_string()))
}

/// Lazy hex formatter for raw byte payloads and keys.
pub struct HexBytes<'a>(pub &'a [u8]);

impl fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
