// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Scenario S5 (spec §8): an audit sweep that only reports a parent
//! directory deletes the child it never saw (blind-spot deletion)
//! while preserving a child created by a REALTIME event during the
//! audit window (Rule 3).

use crate::prelude::*;
use fustor_view::NodePayload;

fn dir(modified_time: f64) -> NodePayload {
    NodePayload { modified_time, size: 0, is_directory: true }
}
fn file(modified_time: f64) -> NodePayload {
    NodePayload { modified_time, size: 1, is_directory: false }
}

#[test]
fn audit_deletes_unreported_child_but_preserves_realtime_child_from_during_window() {
    let mgr = AuditManager::default();
    let mut state = ViewState::new();

    state.update_node("/d", dir(500.0), 900.0);
    state.update_node("/d/a", file(500.0), 900.0);
    assert_eq!(state.get_node("/d/a").unwrap().last_updated_at(), 900.0);

    mgr.handle_audit_start(&mut state, 1000.0);

    // /d/b is created by a REALTIME event after the audit window opened.
    state.update_node("/d/b", file(1100.0), 1100.0);
    assert_eq!(state.get_node("/d/b").unwrap().last_updated_at(), 1100.0);

    // The audit reports only the directory itself, never /d/a or /d/b.
    state.mark_audit_seen("/d");

    mgr.handle_audit_end(&mut state, 1200.0);

    assert!(state.get_node("/d/a").is_none(), "/d/a was never reported by the audit and must be deleted");
    assert!(state.blind_spot_deletions().contains("/d/a"));
    assert!(state.get_node("/d/b").is_some(), "/d/b was created during the audit window (Rule 3)");
    assert!(!state.blind_spot_deletions().contains("/d/b"));
}
