// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Point queries over the log

use crate::journal::{JournalReader, RawEntryData};
use crate::reader::{convert_entry, LogError};
use pit_core::frame::BatchEntryDecoder;
use pit_core::record::{DecodedRecord, PersistedRecord};

/// Point-lookup engine over one partition's log.
pub struct LogSearch {
    journal: JournalReader,
}

impl LogSearch {
    pub fn new(journal: JournalReader) -> Self {
        Self { journal }
    }

    /// Find the single record with the given sequence number.
    ///
    /// Prunes by batch range: batches with `highest_position < position` are
    /// skipped without decoding, and the scan stops at the first batch with
    /// `lowest_position > position` since positions only grow across the
    /// log.
    pub fn search_position(&mut self, position: i64) -> Result<Option<DecodedRecord>, LogError> {
        if position <= 0 {
            return Ok(None);
        }
        self.journal.seek_to_asqn(position)?;
        while let Some(entry) = self.journal.next_entry()? {
            let RawEntryData::Application {
                lowest_position,
                highest_position,
                data,
            } = &entry.data
            else {
                continue;
            };
            if *highest_position < position {
                continue;
            }
            if *lowest_position > position {
                return Ok(None);
            }
            for record in BatchEntryDecoder::new(data) {
                let record = record?;
                if record.position == position {
                    return Ok(Some(record));
                }
            }
        }
        Ok(None)
    }

    /// Find the entry at exactly the given index.
    pub fn search_index(&mut self, index: i64) -> Result<Option<PersistedRecord>, LogError> {
        self.journal.seek(index)?;
        match self.journal.next_entry()? {
            Some(entry) if entry.index == index => Ok(Some(convert_entry(entry)?)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
