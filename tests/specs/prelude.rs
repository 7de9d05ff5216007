//! Shared fixtures for CLI specs

use assert_cmd::Command;
use pit_core::frame::CURRENT_LAYOUT_VERSION;
use pit_core::record::{
    BrokerVersion, DecodedRecord, Intent, RecordType, RecordValue, RejectionType, ValueType,
    KEY_BITS, NO_SOURCE_POSITION,
};
use pit_log::JournalWriter;
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct Fixture {
    temp: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    pub fn pit(&self) -> Command {
        Command::cargo_bin("pit").unwrap()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp.path().join(name)
    }

    /// Partition `1` with five entries:
    ///
    /// 1. control, term 1
    /// 2. batch 100..=101, instance 40 (101 sourced from 100)
    /// 3. batch 102..=102, a rejection against instance 41
    /// 4. control, term 2
    /// 5. batch 103..=104, instance 40
    pub fn sample_log(&self) -> PathBuf {
        let dir = self.path("1");
        let mut writer = JournalWriter::create(&dir, 1).unwrap();
        writer.append_control(1).unwrap();
        writer
            .append_batch(1, &[record(100, 40), sourced(record(101, 40), 100)])
            .unwrap();
        writer.append_batch(1, &[rejection(102, 41)]).unwrap();
        writer.append_control(2).unwrap();
        writer
            .append_batch(2, &[record(103, 40), record(104, 40)])
            .unwrap();
        dir
    }

    /// State store with two jobs, one variable, and one undecodable
    /// incident payload.
    pub fn sample_state(&self) -> PathBuf {
        use pit_core::column_family::ColumnFamily;
        use rocksdb::{DBWithThreadMode, MultiThreaded, Options};

        let dir = self.path("runtime");
        let mut options = Options::default();
        options.create_if_missing(true);
        let db = DBWithThreadMode::<MultiThreaded>::open(&options, &dir).unwrap();
        db.put(
            ColumnFamily::Jobs.composite_key(1),
            br#"{"retries": 3, "worker": "shipper"}"#,
        )
        .unwrap();
        db.put(ColumnFamily::Jobs.composite_key(2), br#"{"retries": 1}"#)
            .unwrap();
        db.put(
            ColumnFamily::Variables.composite_key(10),
            br#"{"name": "total", "value": 99}"#,
        )
        .unwrap();
        db.put(ColumnFamily::Incidents.composite_key(20), [0xde, 0xad])
            .unwrap();
        dir
    }
}

pub fn record(position: i64, process_instance_key: i64) -> DecodedRecord {
    DecodedRecord {
        position,
        source_record_position: NO_SOURCE_POSITION,
        timestamp: 1_700_000_000_000 + position,
        key: (1i64 << KEY_BITS) | position,
        record_type: RecordType::Event,
        value_type: ValueType::ProcessInstance,
        intent: Intent::ElementActivated,
        rejection_type: RejectionType::NullVal,
        rejection_reason: String::new(),
        request_id: 0,
        request_stream_id: -1,
        protocol_version: CURRENT_LAYOUT_VERSION,
        broker_version: BrokerVersion::new(8, 3, 0),
        record_version: 1,
        auth_data: String::new(),
        record_value: RecordValue::Typed(json!({
            "processInstanceKey": process_instance_key,
            "bpmnElementType": "SERVICE_TASK",
        })),
        process_instance_related: None,
    }
}

pub fn sourced(mut record: DecodedRecord, source: i64) -> DecodedRecord {
    record.source_record_position = source;
    record
}

pub fn rejection(position: i64, process_instance_key: i64) -> DecodedRecord {
    DecodedRecord {
        record_type: RecordType::CommandRejection,
        rejection_type: RejectionType::InvalidState,
        rejection_reason: "element is already completed".to_string(),
        ..record(position, process_instance_key)
    }
}
