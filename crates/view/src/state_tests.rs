// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

use super::*;
use crate::node::NodePayload;
use std::time::Duration;

fn file(modified_time: f64) -> NodePayload {
    NodePayload { modified_time, size: 1, is_directory: false }
}

fn dir(modified_time: f64) -> NodePayload {
    NodePayload { modified_time, size: 0, is_directory: true }
}

#[test]
fn delete_node_cascades_through_suspects_and_blind_spots_not_tombstones() {
    let mut state = ViewState::new();
    state.update_node("/a/b.txt", file(100.0), 100.0);
    state.mark_suspect("/a/b.txt", Instant::now() + Duration::from_secs(5), 100.0);
    state.add_blind_spot_addition("/a/b.txt");
    state.set_tombstone("/a/b.txt", 50.0, 50.0);

    state.delete_node("/a");

    assert!(!state.tree().contains("/a"));
    assert!(!state.tree().contains("/a/b.txt"));
    assert!(!state.is_suspect("/a/b.txt"));
    assert!(!state.blind_spot_additions().contains("/a/b.txt"));
    // tombstones are untouched by delete_node
    assert!(state.tombstone("/a/b.txt").is_some());
}

#[test]
fn update_node_type_switch_drops_old_subtree_first() {
    let mut state = ViewState::new();
    state.update_node("/a", dir(100.0), 100.0);
    state.update_node("/a/b.txt", file(100.0), 100.0);

    // /a turns into a file: the old directory (and its child) must go.
    state.update_node("/a", file(200.0), 200.0);

    assert!(!state.tree().contains("/a/b.txt"));
    let node = state.get_node("/a").expect("exists");
    assert_eq!(node.kind(), crate::node::NodeKind::File);
}

#[test]
fn gc_tombstones_removes_entries_past_ttl() {
    let mut state = ViewState::new();
    state.set_tombstone("/old", 1.0, 0.0);
    state.set_tombstone("/fresh", 2.0, 90.0);

    state.gc_tombstones(100.0, 60.0);

    assert!(state.tombstone("/old").is_none());
    assert!(state.tombstone("/fresh").is_some());
}

#[test]
fn mark_and_clear_suspect_round_trip() {
    let mut state = ViewState::new();
    state.update_node("/a.txt", file(100.0), 100.0);
    state.mark_suspect("/a.txt", Instant::now() + Duration::from_secs(1), 100.0);
    assert!(state.is_suspect("/a.txt"));
    assert!(state.get_node("/a.txt").unwrap().integrity_suspect());

    state.clear_suspect("/a.txt");
    assert!(!state.is_suspect("/a.txt"));
    assert!(!state.get_node("/a.txt").unwrap().integrity_suspect());
}

#[test]
fn take_expired_suspects_only_returns_entries_past_expiry() {
    let mut state = ViewState::new();
    state.update_node("/a.txt", file(100.0), 100.0);
    state.update_node("/b.txt", file(100.0), 100.0);

    let now = Instant::now();
    state.mark_suspect("/a.txt", now - Duration::from_secs(1), 100.0);
    state.mark_suspect("/b.txt", now + Duration::from_secs(60), 100.0);

    let expired = state.take_expired_suspects(now);
    assert_eq!(expired, vec!["/a.txt".to_string()]);
    assert!(!state.is_suspect("/a.txt"));
    assert!(state.is_suspect("/b.txt"));
}

#[test]
fn take_expired_suspects_ignores_stale_heap_entries_after_refresh() {
    let mut state = ViewState::new();
    state.update_node("/a.txt", file(100.0), 100.0);
    let now = Instant::now();

    // Mark expiring soon, then refresh with a later expiry before it fires.
    state.mark_suspect("/a.txt", now + Duration::from_millis(1), 100.0);
    state.mark_suspect("/a.txt", now + Duration::from_secs(60), 100.0);

    let expired = state.take_expired_suspects(now + Duration::from_millis(2));
    assert!(expired.is_empty());
    assert!(state.is_suspect("/a.txt"));
}

#[test]
fn delete_node_rejects_root() {
    let mut state = ViewState::new();
    assert!(!state.delete_node("/"));
    assert!(state.tree().contains("/"));
}

#[test]
fn audit_bookkeeping_round_trip() {
    let mut state = ViewState::new();
    assert_eq!(state.last_audit_start(), None);
    state.set_last_audit_start(Some(42.0));
    state.mark_audit_seen("/a");
    assert_eq!(state.last_audit_start(), Some(42.0));
    assert!(state.audit_seen_paths().contains("/a"));

    state.clear_audit_seen_paths();
    state.set_last_audit_start(None);
    assert!(state.audit_seen_paths().is_empty());
    assert_eq!(state.last_audit_start(), None);
}
