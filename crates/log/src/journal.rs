// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Segmented journal reader for a partition's raft log
//!
//! A partition directory (its last path segment is the integer partition
//! id) holds segment files named `raft-partition-partition-<id>-<seg>.log`.
//! Each segment starts with a 32-byte descriptor, little-endian:
//!
//! ```text
//! u32 magic            "SEGJ"
//! u32 format version   1
//! u64 segment id
//! i64 first index      index of the segment's first entry
//! u64 reserved
//! ```
//!
//! followed by framed entries, each `u32 length | u32 crc32 | payload`. A
//! zero length or end of file ends the segment. The entry payload carries
//! `i64 index | i64 term | u8 kind`; application entries (`kind == 1`)
//! continue with `i64 lowest_position | i64 highest_position` and the batch
//! data buffer.
//!
//! Checksum or framing failures surface as [`JournalError::Corrupted`] and
//! end the iteration; entries before the failure remain readable.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub(crate) const SEGMENT_MAGIC: u32 = 0x4A47_4553; // "SEGJ"
pub(crate) const SEGMENT_FORMAT_VERSION: u32 = 1;
pub(crate) const DESCRIPTOR_LEN: usize = 32;
pub(crate) const ENTRY_HEADER_LEN: usize = 8;

pub(crate) const KIND_RAFT_CONTROL: u8 = 0;
pub(crate) const KIND_APPLICATION: u8 = 1;

/// Errors from opening and scanning a partition's journal.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("not a partition directory (last path segment must be the partition id): {path}")]
    InvalidPartitionPath { path: PathBuf },
    #[error("log not found: {path}")]
    NotFound { path: PathBuf },
    #[error("corrupted segment {segment} at offset {offset}: {reason}")]
    Corrupted {
        segment: u64,
        offset: u64,
        reason: String,
    },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// One raw journal entry, before record decoding.
#[derive(Debug, Clone)]
pub struct RawEntry {
    pub index: i64,
    pub term: i64,
    /// Approximate on-disk size: framing plus payload.
    pub size_bytes: usize,
    pub data: RawEntryData,
}

#[derive(Debug, Clone)]
pub enum RawEntryData {
    RaftControl,
    Application {
        lowest_position: i64,
        highest_position: i64,
        data: Vec<u8>,
    },
}

impl RawEntry {
    pub fn is_application(&self) -> bool {
        matches!(self.data, RawEntryData::Application { .. })
    }

    /// The batch's highest sequence number; `None` for control entries.
    pub fn highest_position(&self) -> Option<i64> {
        match &self.data {
            RawEntryData::Application {
                highest_position, ..
            } => Some(*highest_position),
            RawEntryData::RaftControl => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Segment {
    id: u64,
    first_index: i64,
    path: PathBuf,
}

/// Forward-only, seekable reader over a partition's segment files.
///
/// Holds at most one open segment file and one buffered entry; memory use
/// is bounded by a single entry, not the log.
#[derive(Debug)]
pub struct JournalReader {
    partition_id: i32,
    segments: Vec<Segment>,
    next_segment: usize,
    current: Option<BufReader<File>>,
    current_segment: u64,
    offset: u64,
    peeked: Option<RawEntry>,
    failed: bool,
}

impl JournalReader {
    /// Open a partition directory read-only and enumerate its segments.
    pub fn open(path: &Path) -> Result<Self, JournalError> {
        if !path.is_dir() {
            return Err(JournalError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let partition_id = partition_id_from_path(path)?;

        let prefix = format!("raft-partition-partition-{partition_id}-");
        let mut segments = Vec::new();
        for dir_entry in fs::read_dir(path)? {
            let dir_entry = dir_entry?;
            let name = dir_entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let Some(id) = name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(".log"))
                .and_then(|id| id.parse::<u64>().ok())
            else {
                continue;
            };
            let seg_path = dir_entry.path();
            let first_index = read_descriptor(&seg_path, id)?;
            segments.push(Segment {
                id,
                first_index,
                path: seg_path,
            });
        }
        segments.sort_by_key(|s| s.id);
        debug!(partition_id, segments = segments.len(), "opened journal");

        Ok(Self {
            partition_id,
            segments,
            next_segment: 0,
            current: None,
            current_segment: 0,
            offset: 0,
            peeked: None,
            failed: false,
        })
    }

    pub fn partition_id(&self) -> i32 {
        self.partition_id
    }

    /// Position the reader so the next entry has `entry.index >= index`.
    ///
    /// Starts at the last segment whose descriptor `first_index` is at or
    /// below the target and scans forward from there.
    pub fn seek(&mut self, index: i64) -> Result<(), JournalError> {
        self.rewind_to(
            self.segments
                .iter()
                .rposition(|s| s.first_index <= index)
                .unwrap_or(0),
        );
        while let Some(entry) = self.read_entry()? {
            if entry.index >= index {
                self.peeked = Some(entry);
                break;
            }
        }
        Ok(())
    }

    /// Position the reader so the next entry is the first application entry
    /// whose batch could contain the sequence number: `highest >= asqn`.
    /// Control entries in between are skipped.
    pub fn seek_to_asqn(&mut self, asqn: i64) -> Result<(), JournalError> {
        self.rewind_to(0);
        while let Some(entry) = self.read_entry()? {
            match entry.highest_position() {
                Some(highest) if highest >= asqn => {
                    self.peeked = Some(entry);
                    break;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Pull the next entry, or `None` at end of log.
    pub fn next_entry(&mut self) -> Result<Option<RawEntry>, JournalError> {
        if let Some(entry) = self.peeked.take() {
            return Ok(Some(entry));
        }
        self.read_entry()
    }

    fn rewind_to(&mut self, segment: usize) {
        self.next_segment = segment;
        self.current = None;
        self.peeked = None;
        self.failed = false;
    }

    fn corrupted(&self, reason: impl Into<String>) -> JournalError {
        JournalError::Corrupted {
            segment: self.current_segment,
            offset: self.offset,
            reason: reason.into(),
        }
    }

    fn read_entry(&mut self) -> Result<Option<RawEntry>, JournalError> {
        if self.failed {
            return Ok(None);
        }
        loop {
            if self.current.is_none() {
                let Some(segment) = self.segments.get(self.next_segment) else {
                    return Ok(None);
                };
                let mut reader = BufReader::new(File::open(&segment.path)?);
                let mut descriptor = [0u8; DESCRIPTOR_LEN];
                reader.read_exact(&mut descriptor)?;
                self.current_segment = segment.id;
                self.offset = DESCRIPTOR_LEN as u64;
                self.current = Some(reader);
                self.next_segment += 1;
            }

            match self.read_frame()? {
                Some(entry) => return Ok(Some(entry)),
                None => {
                    // segment exhausted, move on
                    self.current = None;
                }
            }
        }
    }

    /// Read one `length | crc | payload` frame from the current segment.
    /// `None` at end of segment (zero length or clean EOF).
    fn read_frame(&mut self) -> Result<Option<RawEntry>, JournalError> {
        let Some(reader) = self.current.as_mut() else {
            return Ok(None);
        };

        let mut header = [0u8; ENTRY_HEADER_LEN];
        match reader.read_exact(&mut header) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(err) => return Err(err.into()),
        }
        let length = u32::from_le_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let checksum = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        if length == 0 {
            return Ok(None);
        }

        let mut payload = vec![0u8; length];
        if let Err(err) = reader.read_exact(&mut payload) {
            self.failed = true;
            if err.kind() == io::ErrorKind::UnexpectedEof {
                return Err(self.corrupted(format!("entry of {length} bytes cut off by EOF")));
            }
            return Err(err.into());
        }
        if crc32fast::hash(&payload) != checksum {
            self.failed = true;
            return Err(self.corrupted("checksum mismatch"));
        }

        let entry = match self.parse_payload(&payload) {
            Ok(entry) => entry,
            Err(err) => {
                self.failed = true;
                return Err(err);
            }
        };
        self.offset += (ENTRY_HEADER_LEN + length) as u64;
        Ok(Some(entry))
    }

    fn parse_payload(&self, payload: &[u8]) -> Result<RawEntry, JournalError> {
        if payload.len() < 17 {
            return Err(self.corrupted(format!("entry payload of {} bytes too short", payload.len())));
        }
        let index = i64::from_le_bytes(sub8(payload, 0));
        let term = i64::from_le_bytes(sub8(payload, 8));
        let kind = payload[16];
        let size_bytes = ENTRY_HEADER_LEN + payload.len();

        let data = match kind {
            KIND_RAFT_CONTROL => RawEntryData::RaftControl,
            KIND_APPLICATION => {
                if payload.len() < 33 {
                    return Err(self.corrupted("application entry missing position range"));
                }
                RawEntryData::Application {
                    lowest_position: i64::from_le_bytes(sub8(payload, 17)),
                    highest_position: i64::from_le_bytes(sub8(payload, 25)),
                    data: payload[33..].to_vec(),
                }
            }
            other => {
                return Err(self.corrupted(format!("unknown entry kind {other}")));
            }
        };

        Ok(RawEntry {
            index,
            term,
            size_bytes,
            data,
        })
    }
}

impl Iterator for JournalReader {
    type Item = Result<RawEntry, JournalError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().transpose()
    }
}

fn partition_id_from_path(path: &Path) -> Result<i32, JournalError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.parse::<i32>().ok())
        .ok_or_else(|| JournalError::InvalidPartitionPath {
            path: path.to_path_buf(),
        })
}

/// Validate a segment descriptor and return its first index.
fn read_descriptor(path: &Path, expected_id: u64) -> Result<i64, JournalError> {
    let mut file = File::open(path)?;
    let mut descriptor = [0u8; DESCRIPTOR_LEN];
    let corrupted = |reason: String| JournalError::Corrupted {
        segment: expected_id,
        offset: 0,
        reason,
    };
    file.read_exact(&mut descriptor)
        .map_err(|_| corrupted("segment shorter than its descriptor".to_string()))?;

    let magic = u32::from_le_bytes([descriptor[0], descriptor[1], descriptor[2], descriptor[3]]);
    if magic != SEGMENT_MAGIC {
        return Err(corrupted(format!("bad segment magic {magic:#010x}")));
    }
    let version = u32::from_le_bytes([descriptor[4], descriptor[5], descriptor[6], descriptor[7]]);
    if version != SEGMENT_FORMAT_VERSION {
        return Err(corrupted(format!("unsupported segment format version {version}")));
    }
    let id = u64::from_le_bytes(sub8(&descriptor, 8));
    if id != expected_id {
        return Err(corrupted(format!(
            "descriptor segment id {id} does not match file name ({expected_id})"
        )));
    }
    Ok(i64::from_le_bytes(sub8(&descriptor, 16)))
}

fn sub8(bytes: &[u8], at: usize) -> [u8; 8] {
    let mut out = [0u8; 8];
    out.copy_from_slice(&bytes[at..at + 8]);
    out
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
