// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Shared helpers for the workspace-level scenario tests (spec §8).

pub use fustor_core::{Event, EventType, FakeClock, LogicalClock, MessageSource};
pub use fustor_session::SessionManager;
pub use fustor_view::{Arbitrator, AuditManager, ViewState};
pub use fustor_wire::{ClientInfo, Role};
pub use serde_json::json;
pub use std::collections::HashMap;
pub use std::time::{Duration, Instant};

pub fn row(path: &str, modified_time: f64, is_directory: bool) -> HashMap<String, serde_json::Value> {
    let mut m = HashMap::new();
    m.insert("path".to_string(), json!(path));
    m.insert("modified_time".to_string(), json!(modified_time));
    m.insert("size".to_string(), json!(1));
    m.insert("is_directory".to_string(), json!(is_directory));
    m
}

/// Runs a built `fustor-cli` binary (`fustord` or `fustor-agentd`)
/// against a config path, for the black-box exit-code specs.
pub fn cli_bin(name: &str) -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin(name).expect("binary built by the workspace")
}

pub fn event(event_type: EventType, source: MessageSource, rows: Vec<HashMap<String, serde_json::Value>>) -> Event {
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
