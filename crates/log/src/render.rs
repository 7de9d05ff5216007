// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Human-oriented serialization of decoded log content
//!
//! The table lists one row per domain record. The DOT form reconstructs the
//! causal chain: every record is a node keyed by its position, and a record
//! with a source position gets an edge back to the record that triggered it.

use crate::reader::LogContent;
use pit_core::record::{ApplicationBatch, DecodedRecord, PersistedRecord};

pub const TABLE_HEADER: &str = "Index Term Position SourceRecordPosition Timestamp Key \
     RecordType ValueType Intent ProcessInstanceKey BPMNElementType";

impl LogContent {
    /// Render a space-separated table with one row per domain record.
    /// Control entries carry no records and produce no rows.
    pub fn as_table(&self) -> String {
        let mut out = String::from(TABLE_HEADER);
        out.push('\n');
        for record in &self.records {
            if let PersistedRecord::Application(batch) = record {
                append_batch_rows(&mut out, batch);
            }
        }
        out
    }

    /// Render a DOT digraph of the causal record chain.
    pub fn as_dot_file(&self) -> String {
        let mut out = String::from("digraph log {\n  rankdir=\"RL\";\n");
        for record in &self.records {
            if let PersistedRecord::Application(batch) = record {
                for entry in &batch.entries {
                    append_node(&mut out, entry);
                }
            }
        }
        out.push_str("}\n");
        out
    }
}

fn append_batch_rows(out: &mut String, batch: &ApplicationBatch) {
    for entry in &batch.entries {
        out.push_str(&format!(
            "{} {} {} {} {} {} {} {} {}",
            batch.index,
            batch.term,
            entry.position,
            entry.source_record_position,
            entry.timestamp,
            entry.key,
            entry.record_type,
            entry.value_type,
            entry.intent,
        ));
        if let Some(related) = &entry.process_instance_related {
            if let Some(key) = related.process_instance_key {
                out.push_str(&format!(" {key}"));
            }
            if let Some(element_type) = &related.bpmn_element_type {
                out.push_str(&format!(" {element_type}"));
            }
        }
        out.push('\n');
    }
}

fn append_node(out: &mut String, entry: &DecodedRecord) {
    let mut label = format!(
        "{}\\n{}\\n{}",
        entry.record_type, entry.value_type, entry.intent
    );
    if let Some(related) = &entry.process_instance_related {
        if let Some(element_type) = &related.bpmn_element_type {
            label.push_str(&format!("\\n{element_type}"));
        }
        if let Some(key) = related.process_instance_key {
            label.push_str(&format!("\\nPI Key: {key}"));
        }
        if let Some(key) = related.process_definition_key {
            label.push_str(&format!("\\nPD Key: {key}"));
        }
    }
    label.push_str(&format!("\\nKey: {}", entry.key));

    out.push_str(&format!(
        "  \"{}\" [label=\"{}\"];\n",
        entry.position, label
    ));
    if entry.has_source() {
        out.push_str(&format!(
            "  \"{}\" -> \"{}\";\n",
            entry.position, entry.source_record_position
        ));
    }
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
