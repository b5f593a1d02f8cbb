// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

use super::*;
use crate::types::SourceType;

#[test]
fn create_session_round_trips_and_tags_with_type() {
    let req = Request::CreateSession {
        task_id: "agt-1:pip-1".into(),
        client_info: None,
        session_timeout_seconds: Some(30),
    };
    let json = serde_json::to_value(&req).expect("serialize");
    assert_eq!(json["type"], "session:create");
    let parsed: Request = serde_json::from_value(json).expect("deserialize");
    assert_eq!(parsed, req);
}

#[test]
fn heartbeat_defaults_can_realtime_to_false() {
    let json = serde_json::json!({"type": "session:heartbeat", "session_id": "s1"});
    let parsed: Request = serde_json::from_value(json).expect("deserialize");
    match parsed {
        Request::Heartbeat { can_realtime, .. } => assert!(!can_realtime),
        _ => panic!("wrong variant"),
    }
}

#[test]
fn ingest_carries_typed_event_batch() {
    let batch = crate::types::EventBatch {
        events: vec![],
        source_type: SourceType::Snapshot,
        is_end: true,
        metadata: None,
    };
    let req = Request::Ingest { session_id: "s1".into(), batch };
    let json = serde_json::to_string(&req).expect("serialize");
    let parsed: Request = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(parsed, req);
}
