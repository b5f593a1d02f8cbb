// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

use super::*;
use fustor_core::{EventType, MessageSource};
use fustor_view::NodeKind;
use serde_json::json;
use std::collections::HashMap;

fn row(path: &str, modified_time: f64) -> HashMap<String, serde_json::Value> {
    let mut m = HashMap::new();
    m.insert("path".to_string(), json!(path));
    m.insert("modified_time".to_string(), json!(modified_time));
    m.insert("size".to_string(), json!(1));
    m.insert("is_directory".to_string(), json!(false));
    m
}

fn insert_event(path: &str, modified_time: f64) -> Event {
    Event::new(
        EventType::Insert,
        "fs".to_string(),
        "files".to_string(),
        vec!["path".to_string(), "modified_time".to_string(), "size".to_string(), "is_directory".to_string()],
        vec![row(path, modified_time)],
        MessageSource::Realtime,
        0,
    )
}

#[tokio::test]
async fn enqueue_applies_event_through_the_drain_task() {
    let worker = ViewWorker::spawn(View::new());
    worker.enqueue(insert_event("/a.txt", 100.0)).await.unwrap();

    // Drain is async; poll briefly for it to land.
    for _ in 0..50 {
        if worker.node_kind("/a.txt").is_some() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    assert_eq!(worker.node_kind("/a.txt"), Some(NodeKind::File));
}

#[tokio::test]
async fn close_audit_clears_the_open_epoch() {
    let worker = ViewWorker::spawn(View::new());
    worker.open_audit();
    worker.close_audit().await.unwrap();
    // No direct introspection of epoch state through the worker; this
    // only asserts the queued call doesn't hang or error.
}
