// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed log reading with seeks, limits, and filters
//!
//! Wraps a [`JournalReader`] and classifies each raw entry: control entries
//! become [`RaftControlRecord`]s, application entries run through the framed
//! record decoder and become [`ApplicationBatch`]es. Iteration is lazy, one
//! entry at a time; nothing is decoded ahead of what the caller pulls.

use crate::journal::{JournalError, JournalReader, RawEntry, RawEntryData};
use pit_core::frame::{BatchEntryDecoder, MalformedRecordError};
use pit_core::record::{ApplicationBatch, PersistedRecord, RaftControlRecord, RecordType};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors from reading decoded log content.
#[derive(Debug, Error)]
pub enum LogError {
    #[error(transparent)]
    Journal(#[from] JournalError),
    #[error(transparent)]
    Malformed(#[from] MalformedRecordError),
}

/// Decoded log entries collected by [`LogContentReader::read_all`].
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct LogContent {
    pub records: Vec<PersistedRecord>,
}

impl fmt::Display for LogContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(fmt::Error),
        }
    }
}

/// Batch-level acceptance predicate. A batch is yielded whole when any
/// contained record matches.
#[derive(Debug, Clone, Copy)]
enum BatchFilter {
    ProcessInstance(i64),
    Rejections,
}

impl BatchFilter {
    fn accepts(&self, batch: &ApplicationBatch) -> bool {
        match self {
            BatchFilter::ProcessInstance(key) => batch.entries.iter().any(|record| {
                record
                    .process_instance_related
                    .as_ref()
                    .is_some_and(|related| related.process_instance_key == Some(*key))
            }),
            BatchFilter::Rejections => batch
                .entries
                .iter()
                .any(|record| record.record_type == RecordType::CommandRejection),
        }
    }
}

/// Lazy reader over decoded log entries.
///
/// Seeks position the cursor, `limit_to_position` installs a stop predicate,
/// and filters install a batch-level acceptance predicate. While a filter is
/// active, control entries are suppressed and non-matching batches are
/// skipped without being yielded.
pub struct LogContentReader {
    journal: JournalReader,
    filter: Option<BatchFilter>,
    limit: Option<i64>,
    done: bool,
}

impl LogContentReader {
    pub fn new(journal: JournalReader) -> Self {
        Self {
            journal,
            filter: None,
            limit: None,
            done: false,
        }
    }

    /// Start iteration at the first entry with `index >= index`.
    pub fn seek_to_index(&mut self, index: i64) -> Result<(), LogError> {
        self.journal.seek(index)?;
        Ok(())
    }

    /// Start iteration at the first batch that could contain `position`.
    pub fn seek_to_position(&mut self, position: i64) -> Result<(), LogError> {
        self.journal.seek_to_asqn(position)?;
        Ok(())
    }

    /// Stop iterating once a batch's `lowest_position >= position`. Control
    /// entries never trigger the stop.
    pub fn limit_to_position(&mut self, position: i64) {
        self.limit = Some(position);
    }

    /// Only yield batches with a record related to the process instance.
    pub fn filter_for_process_instance(&mut self, key: i64) {
        self.filter = Some(BatchFilter::ProcessInstance(key));
    }

    /// Only yield batches containing at least one command rejection.
    pub fn only_rejections(&mut self) {
        self.filter = Some(BatchFilter::Rejections);
    }

    /// Pull the next accepted entry, or `None` at end of log or once the
    /// position limit is reached.
    pub fn next_record(&mut self) -> Result<Option<PersistedRecord>, LogError> {
        if self.done {
            return Ok(None);
        }
        while let Some(entry) = self.journal.next_entry()? {
            match &entry.data {
                RawEntryData::RaftControl => {
                    if self.filter.is_none() {
                        return Ok(Some(convert_entry(entry)?));
                    }
                }
                RawEntryData::Application {
                    lowest_position, ..
                } => {
                    if self.limit.is_some_and(|limit| *lowest_position >= limit) {
                        self.done = true;
                        return Ok(None);
                    }
                    let record = convert_entry(entry)?;
                    let accepted = match (&self.filter, &record) {
                        (Some(filter), PersistedRecord::Application(batch)) => {
                            filter.accepts(batch)
                        }
                        _ => true,
                    };
                    if accepted {
                        return Ok(Some(record));
                    }
                }
            }
        }
        Ok(None)
    }

    /// Collect every remaining accepted entry. Prefer [`Self::next_record`]
    /// for streaming consumption.
    pub fn read_all(mut self) -> Result<LogContent, LogError> {
        let mut records = Vec::new();
        while let Some(record) = self.next_record()? {
            records.push(record);
        }
        Ok(LogContent { records })
    }
}

/// Classify one raw entry and decode its batch content.
pub(crate) fn convert_entry(entry: RawEntry) -> Result<PersistedRecord, LogError> {
    match entry.data {
        RawEntryData::RaftControl => Ok(PersistedRecord::Raft(RaftControlRecord {
            index: entry.index,
            term: entry.term,
        })),
        RawEntryData::Application {
            lowest_position,
            highest_position,
            data,
        } => {
            let entries = BatchEntryDecoder::new(&data).collect::<Result<Vec<_>, _>>()?;
            Ok(PersistedRecord::Application(ApplicationBatch {
                index: entry.index,
                term: entry.term,
                highest_position,
                lowest_position,
                entries,
            }))
        }
    }
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
