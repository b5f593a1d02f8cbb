// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Scenario S3 (spec §8): a snapshot row newer than the tombstone
//! resurrects the path and clears the tombstone.

use crate::prelude::*;

#[test]
fn snapshot_newer_than_tombstone_resurrects_and_clears_it() {
    let arb = Arbitrator::default();
    let mut state = ViewState::new();

    let del = event(EventType::Delete, MessageSource::Realtime, vec![row("/ghost.txt", 1000.0, false)]);
    arb.process_event(&mut state, 1000.0, 1000.0, Instant::now(), &del);

    let stale = event(EventType::Update, MessageSource::Snapshot, vec![row("/ghost.txt", 900.0, false)]);
    arb.process_event(&mut state, 1000.0, 1000.0, Instant::now(), &stale);
    assert!(state.get_node("/ghost.txt").is_none());

    let resurrect = event(EventType::Update, MessageSource::Snapshot, vec![row("/ghost.txt", 1500.0, false)]);
    arb.process_event(&mut state, 1500.0, 1500.0, Instant::now(), &resurrect);

    let node = state.get_node("/ghost.txt").expect("resurrected node");
    assert_eq!(node.modified_time(), 1500.0);
    assert!(state.tombstone("/ghost.txt").is_none());
}
