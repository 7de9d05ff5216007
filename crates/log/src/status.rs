// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Streaming log summary

use crate::journal::{JournalError, JournalReader, RawEntryData};
use serde::Serialize;
use std::fmt;

/// Summary statistics from a single forward pass over the whole log.
///
/// Sizes are approximate on-disk entry sizes. Record positions come from
/// application entries only. All fields stay zero for an empty log.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStatusDetails {
    pub scanned_entries: u64,
    pub lowest_index: i64,
    pub highest_index: i64,
    pub highest_term: i64,
    pub min_entry_size_bytes: u64,
    pub max_entry_size_bytes: u64,
    pub avg_entry_size_bytes: u64,
    pub lowest_record_position: i64,
    pub highest_record_position: i64,
}

impl LogStatusDetails {
    /// Scan the journal front to back and aggregate.
    pub fn scan(journal: &mut JournalReader) -> Result<Self, JournalError> {
        let mut details = Self::default();
        let mut size_sum = 0u64;

        while let Some(entry) = journal.next_entry()? {
            let size = entry.size_bytes as u64;
            if details.scanned_entries == 0 {
                details.lowest_index = entry.index;
                details.min_entry_size_bytes = size;
            }
            details.scanned_entries += 1;
            details.highest_index = details.highest_index.max(entry.index);
            details.highest_term = details.highest_term.max(entry.term);
            details.min_entry_size_bytes = details.min_entry_size_bytes.min(size);
            details.max_entry_size_bytes = details.max_entry_size_bytes.max(size);
            size_sum += size;

            if let RawEntryData::Application {
                lowest_position,
                highest_position,
                ..
            } = &entry.data
            {
                if details.lowest_record_position == 0 {
                    details.lowest_record_position = *lowest_position;
                }
                details.highest_record_position =
                    details.highest_record_position.max(*highest_position);
            }
        }

        if details.scanned_entries > 0 {
            details.avg_entry_size_bytes = size_sum / details.scanned_entries;
        }
        Ok(details)
    }
}

impl fmt::Display for LogStatusDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(fmt::Error),
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
