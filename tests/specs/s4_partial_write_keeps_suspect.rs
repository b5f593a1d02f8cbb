// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Scenario S4 (spec §8): repeated non-atomic writes keep a node
//! `integrity_suspect` until an atomic write clears it.

use crate::prelude::*;

#[test]
fn partial_writes_stay_suspect_until_an_atomic_write_clears_it() {
    let arb = Arbitrator::default();
    let mut state = ViewState::new();

    for i in 0..5u64 {
        let w = 100.0 + i as f64;
        let mut r = row("/big.bin", w, false);
        r.insert("size".to_string(), json!(1000 * (i + 1)));
        r.insert("is_atomic_write".to_string(), json!(false));
        let e = event(EventType::Update, MessageSource::Realtime, vec![r]);
        arb.process_event(&mut state, w, w, Instant::now(), &e);
        assert!(state.is_suspect("/big.bin"), "still suspect after partial write {i}");
    }

    let w = 300.0;
    let mtime = 104.0; // age = 196s, comfortably past the 30s hot threshold
    let mut r = row("/big.bin", mtime, false);
    r.insert("is_atomic_write".to_string(), json!(true));
    let e = event(EventType::Update, MessageSource::Realtime, vec![r]);
    arb.process_event(&mut state, w, w, Instant::now(), &e);

    assert!(!state.is_suspect("/big.bin"));
}
