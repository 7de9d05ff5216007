// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only access to a partition's replicated log
//!
//! [`journal`] owns the segment files and yields raw entries; [`reader`]
//! turns raw entries into typed records and applies seeks, limits, and
//! filters; [`search`] answers point queries; [`status`] aggregates a
//! streaming summary; [`render`] serializes decoded content for humans.
//!
//! All handles are single-threaded and opened read-only. Concurrent
//! inspection of the same partition takes one handle per caller.

pub mod journal;
pub mod reader;
pub mod render;
pub mod search;
pub mod status;
#[cfg(any(test, feature = "test-support"))]
pub mod writer;

pub use journal::{JournalError, JournalReader, RawEntry, RawEntryData};
pub use reader::{LogContent, LogContentReader, LogError};
pub use search::LogSearch;
pub use status::LogStatusDetails;
#[cfg(any(test, feature = "test-support"))]
pub use writer::JournalWriter;
