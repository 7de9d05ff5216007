// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only access to a partition's embedded state store

pub mod reader;

pub use reader::{StateEntry, StateError, StateReader};
