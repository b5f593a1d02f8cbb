// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Scenario S1 (spec §8): majority skew wins over a vocal minority.

use crate::prelude::*;

#[test]
fn majority_skew_wins_and_minority_outliers_are_ignored() {
    let physical = FakeClock::new();
    physical.set_epoch_secs(2000.0);
    let clock = LogicalClock::new(physical);

    for _ in 0..5 {
        clock.update(Some(1900.0), true); // skew = 100
    }
    for _ in 0..2 {
        clock.update(Some(2500.0), true); // skew = -500
    }

    assert_eq!(clock.skew(), 100);
    assert_eq!(clock.now(), 1900.0);
}
