// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Scenario S2 (spec §8): a tombstone blocks a stale snapshot
//! resurrection attempt while staying present itself.

use crate::prelude::*;

#[test]
fn stale_snapshot_after_delete_is_rejected_and_tombstone_survives() {
    let arb = Arbitrator::default();
    let mut state = ViewState::new();

    let del = event(EventType::Delete, MessageSource::Realtime, vec![row("/ghost.txt", 1000.0, false)]);
    arb.process_event(&mut state, 1000.0, 1000.0, Instant::now(), &del);
    assert!(state.get_node("/ghost.txt").is_none());
    assert!(state.tombstone("/ghost.txt").is_some());

    let stale = event(EventType::Update, MessageSource::Snapshot, vec![row("/ghost.txt", 900.0, false)]);
    arb.process_event(&mut state, 1000.0, 1000.0, Instant::now(), &stale);

    assert!(state.get_node("/ghost.txt").is_none());
    assert!(state.tombstone("/ghost.txt").is_some());
}
