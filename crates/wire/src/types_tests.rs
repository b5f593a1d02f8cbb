// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

use super::*;

#[test]
fn source_type_maps_to_message_source() {
    assert_eq!(MessageSource::from(SourceType::Message), MessageSource::Realtime);
    assert_eq!(MessageSource::from(SourceType::Snapshot), MessageSource::Snapshot);
    assert_eq!(MessageSource::from(SourceType::Audit), MessageSource::Audit);
}

#[test]
fn role_display_matches_wire_casing() {
    assert_eq!(Role::Leader.to_string(), "leader");
    assert_eq!(Role::Follower.to_string(), "follower");
}

#[test]
fn command_serializes_with_tag() {
    let cmd = Command::Scan { path: "/data".into(), recursive: true, job_id: "job-1".into() };
    let json = serde_json::to_value(&cmd).expect("serialize");
    assert_eq!(json["command"], "scan");
    assert_eq!(json["path"], "/data");
}

#[test]
fn command_round_trips_through_json() {
    let cmd = Command::UpdateConfig { config_yaml: "a: 1".into(), filename: "agent.yaml".into() };
    let json = serde_json::to_string(&cmd).expect("serialize");
    let parsed: Command = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(parsed, cmd);
}

#[test]
fn client_info_collects_unknown_fields_into_extra() {
    let json = serde_json::json!({"hostname": "h1", "region": "us-east"});
    let info: ClientInfo = serde_json::from_value(json).expect("deserialize");
    assert_eq!(info.hostname.as_deref(), Some("h1"));
    assert_eq!(info.extra.get("region").and_then(|v| v.as_str()), Some("us-east"));
}
