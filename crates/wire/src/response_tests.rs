// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

use super::*;

#[test]
fn ok_serializes_to_bare_tag() {
    let json = serde_json::to_value(Response::Ok).expect("serialize");
    assert_eq!(json["type"], "Ok");
}

#[test]
fn session_obsoleted_round_trips() {
    let json = serde_json::to_value(Response::SessionObsoleted).expect("serialize");
    let parsed: Response = serde_json::from_value(json).expect("deserialize");
    assert_eq!(parsed, Response::SessionObsoleted);
}

#[test]
fn heartbeat_ack_omits_empty_commands_and_absent_role() {
    let resp = Response::HeartbeatAck { role: None, message: None, commands: vec![] };
    let json = serde_json::to_value(&resp).expect("serialize");
    assert!(json.get("role").is_none());
    assert!(json.get("commands").is_none());
}

#[test]
fn session_created_carries_role_and_timeout() {
    let resp = Response::SessionCreated {
        session_id: "sess-1".into(),
        role: Role::Leader,
        session_timeout_seconds: 30,
        message: None,
    };
    let json = serde_json::to_value(&resp).expect("serialize");
    assert_eq!(json["role"], "leader");
    assert_eq!(json["session_timeout_seconds"], 30);
}
