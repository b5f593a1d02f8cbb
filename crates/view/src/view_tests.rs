// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

use super::*;
use fustor_core::{EventType, FakeClock, MessageSource};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

fn row(path: &str, modified_time: f64, is_directory: bool) -> HashMap<String, serde_json::Value> {
    let mut m = HashMap::new();
    m.insert("path".to_string(), json!(path));
    m.insert("modified_time".to_string(), json!(modified_time));
    m.insert("size".to_string(), json!(1));
    m.insert("is_directory".to_string(), json!(is_directory));
    m
}

fn event(event_type: EventType, source: MessageSource, rows: Vec<HashMap<String, serde_json::Value>>) -> Event {
    Event::new(
        event_type,
        "fs".to_string(),
        "files".to_string(),
        vec!["path".to_string(), "modified_time".to_string(), "size".to_string(), "is_directory".to_string()],
        rows,
        source,
        0,
    )
}

#[test]
fn process_event_inserts_node_visible_via_get_node() {
    let clock = FakeClock::new();
    clock.set_epoch_secs(100.0);
    let mut view = View::with_clock(clock);

    let e = event(EventType::Insert, MessageSource::Realtime, vec![row("/a.txt", 100.0, false)]);
    view.process_event(&e);

    assert!(view.get_node("/a.txt").is_some());
}

#[test]
fn audit_start_and_end_round_trip_through_view() {
    let clock = FakeClock::new();
    clock.set_epoch_secs(100.0);
    let mut view = View::with_clock(clock);

    let e = event(EventType::Insert, MessageSource::Audit, vec![row("/a/b.txt", 100.0, false)]);
    view.process_event(&e);
    assert!(view.state().last_audit_start().is_some());

    view.handle_audit_end();
    assert!(view.state().last_audit_start().is_none());
}

#[test]
fn take_expired_suspects_surfaces_after_clock_advance() {
    let clock = FakeClock::new();
    clock.set_epoch_secs(100.0);
    let mut view = View::with_clock(clock.clone());

    let e = event(EventType::Insert, MessageSource::Realtime, vec![row("/a.txt", 100.0, false)]);
    view.process_event(&e);
    assert!(view.get_node("/a.txt").unwrap().integrity_suspect());

    clock.advance(Duration::from_secs(120));
    let expired = view.take_expired_suspects();
    assert_eq!(expired, vec!["/a.txt".to_string()]);
}
