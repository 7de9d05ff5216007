// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixture writer producing well-formed segment files for tests
//!
//! Mirrors the on-disk format documented in [`crate::journal`]. Only built
//! for tests and the `test-support` feature; the inspection tool never
//! writes log artifacts.

use crate::journal::{
    DESCRIPTOR_LEN, KIND_APPLICATION, KIND_RAFT_CONTROL, SEGMENT_FORMAT_VERSION, SEGMENT_MAGIC,
};
use pit_core::frame::{encode_record, encode_record_legacy};
use pit_core::record::DecodedRecord;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Writes segment files for one partition directory.
pub struct JournalWriter {
    dir: PathBuf,
    partition_id: i32,
    segment_id: u64,
    next_index: i64,
    file: File,
}

impl JournalWriter {
    /// Create the partition directory (if needed) and its first segment.
    pub fn create(dir: &Path, partition_id: i32) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let file = new_segment(dir, partition_id, 1, 1)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            partition_id,
            segment_id: 1,
            next_index: 1,
            file,
        })
    }

    /// Close the current segment and start the next one.
    pub fn roll_segment(&mut self) -> io::Result<()> {
        self.file.flush()?;
        self.segment_id += 1;
        self.file = new_segment(
            &self.dir,
            self.partition_id,
            self.segment_id,
            self.next_index,
        )?;
        Ok(())
    }

    /// Append a raft control entry; returns its index.
    pub fn append_control(&mut self, term: i64) -> io::Result<i64> {
        let index = self.next_index;
        let mut payload = Vec::new();
        payload.extend_from_slice(&index.to_le_bytes());
        payload.extend_from_slice(&term.to_le_bytes());
        payload.push(KIND_RAFT_CONTROL);
        self.append_frame(&payload)?;
        self.next_index += 1;
        Ok(index)
    }

    /// Append an application batch; the position range is taken from the
    /// records. Returns the entry's index.
    pub fn append_batch(&mut self, term: i64, records: &[DecodedRecord]) -> io::Result<i64> {
        self.append_batch_with(term, records, encode_record)
    }

    /// Append an application batch framed with the legacy metadata layout.
    pub fn append_batch_legacy(&mut self, term: i64, records: &[DecodedRecord]) -> io::Result<i64> {
        self.append_batch_with(term, records, encode_record_legacy)
    }

    /// Append an application entry with an explicit position range and raw
    /// batch bytes, for malformed-content fixtures.
    pub fn append_raw_batch(
        &mut self,
        term: i64,
        lowest_position: i64,
        highest_position: i64,
        data: &[u8],
    ) -> io::Result<i64> {
        let index = self.next_index;
        let mut payload = Vec::new();
        payload.extend_from_slice(&index.to_le_bytes());
        payload.extend_from_slice(&term.to_le_bytes());
        payload.push(KIND_APPLICATION);
        payload.extend_from_slice(&lowest_position.to_le_bytes());
        payload.extend_from_slice(&highest_position.to_le_bytes());
        payload.extend_from_slice(data);
        self.append_frame(&payload)?;
        self.next_index += 1;
        Ok(index)
    }

    /// Append a frame whose stored checksum does not match its payload.
    pub fn append_corrupt_entry(&mut self) -> io::Result<()> {
        let payload = vec![0u8; 24];
        self.file.write_all(&(payload.len() as u32).to_le_bytes())?;
        self.file
            .write_all(&(crc32fast::hash(&payload) ^ 0xffff_ffff).to_le_bytes())?;
        self.file.write_all(&payload)?;
        self.file.flush()
    }

    /// The partition directory being written.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn append_batch_with(
        &mut self,
        term: i64,
        records: &[DecodedRecord],
        encode: fn(&mut Vec<u8>, &DecodedRecord),
    ) -> io::Result<i64> {
        let lowest = records.iter().map(|r| r.position).min().unwrap_or(0);
        let highest = records.iter().map(|r| r.position).max().unwrap_or(0);
        let mut data = Vec::new();
        for record in records {
            encode(&mut data, record);
        }
        self.append_raw_batch(term, lowest, highest, &data)
    }

    fn append_frame(&mut self, payload: &[u8]) -> io::Result<()> {
        self.file.write_all(&(payload.len() as u32).to_le_bytes())?;
        self.file.write_all(&crc32fast::hash(payload).to_le_bytes())?;
        self.file.write_all(payload)?;
        self.file.flush()
    }
}

fn new_segment(dir: &Path, partition_id: i32, segment_id: u64, first_index: i64) -> io::Result<File> {
    let path = dir.join(format!(
        "raft-partition-partition-{partition_id}-{segment_id}.log"
    ));
    let mut file = File::create(path)?;
    let mut descriptor = [0u8; DESCRIPTOR_LEN];
    descriptor[0..4].copy_from_slice(&SEGMENT_MAGIC.to_le_bytes());
    descriptor[4..8].copy_from_slice(&SEGMENT_FORMAT_VERSION.to_le_bytes());
    descriptor[8..16].copy_from_slice(&segment_id.to_le_bytes());
    descriptor[16..24].copy_from_slice(&first_index.to_le_bytes());
    file.write_all(&descriptor)?;
    Ok(file)
}
