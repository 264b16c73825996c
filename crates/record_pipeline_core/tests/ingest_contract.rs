use std::collections::HashSet;

use chrono::{DateTime, Utc};
use record_pipeline_core::contract::IngestRecord;
use record_pipeline_core::event::decode_event_body;
use record_pipeline_core::normalize::{new_record_id, normalize_ingest};
use record_pipeline_core::validation::validate_ingest_payload;
use serde_json::{json, Value};

fn ingest(event: Value) -> IngestRecord {
    let payload = decode_event_body(event).expect("event should decode");
    let request = validate_ingest_payload(&payload).expect("payload should validate");
    normalize_ingest(request, new_record_id(), Utc::now())
}

#[test]
fn persisted_shape_reads_back_with_original_values() {
    let record = ingest(json!({"body": "{\"principalId\": 42, \"content\": {\"a\": 1}}"}));

    let stored = serde_json::to_string(&record).expect("record should serialize");
    let read_back: IngestRecord = serde_json::from_str(&stored).expect("record should decode");

    assert_eq!(read_back.principal_id.value(), 42.0);
    assert_eq!(read_back.body, json!({"a": 1}));
    assert_eq!(read_back, record);
}

#[test]
fn identical_inputs_never_share_an_id() {
    let ids: HashSet<String> = (0..256)
        .map(|_| ingest(json!({"principalId": 1, "content": "same"})).id)
        .collect();

    assert_eq!(ids.len(), 256);
}

#[test]
fn created_at_is_rfc3339_utc() {
    let record = ingest(json!({"principalId": "5", "content": "hello"}));

    let parsed = DateTime::parse_from_rfc3339(&record.created_at).expect("created_at parses");
    assert_eq!(parsed.offset().local_minus_utc(), 0);
    assert!(record.created_at.ends_with('Z'));
    assert_eq!(serde_json::to_value(&record).expect("serialize")["principalId"], json!(5));
}
