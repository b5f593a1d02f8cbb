// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Per-counter exponential backoff (spec §4.6 "Control/Data Plane
//! isolation"): `error_retry_interval × backoff_multiplier^n`, capped
//! at `max_backoff_seconds`. Control-plane and data-plane failures
//! track independent counters so a batch rejection never slows down
//! the heartbeat cadence and vice versa.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

pub struct Backoff {
    consecutive_errors: AtomicU32,
    error_retry_interval: u64,
    backoff_multiplier: f64,
    max_backoff_seconds: u64,
    max_consecutive_errors: u32,
    warned: std::sync::atomic::AtomicBool,
}

impl Backoff {
    pub fn new(
        error_retry_interval: u64,
        backoff_multiplier: f64,
        max_backoff_seconds: u64,
        max_consecutive_errors: u32,
    ) -> Self {
        Self {
            consecutive_errors: AtomicU32::new(0),
            error_retry_interval,
            backoff_multiplier,
            max_backoff_seconds,
            max_consecutive_errors,
            warned: std::sync::atomic::AtomicBool::new(false),
        }
    }

    pub fn count(&self) -> u32 {
        self.consecutive_errors.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.consecutive_errors.store(0, Ordering::Relaxed);
        self.warned.store(false, Ordering::Relaxed);
    }

    /// Records a failure, returning the delay to wait before retrying
    /// and whether the `max_consecutive_errors` threshold was just
    /// crossed for the first time (spec §4.6: "emits a warning once and
    /// keeps running").
    pub fn record_failure(&self) -> (Duration, bool) {
        let n = self.consecutive_errors.fetch_add(1, Ordering::Relaxed) + 1;
        let just_crossed = n == self.max_consecutive_errors
            && self.warned.compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed).is_ok();
        (self.delay_for(n), just_crossed)
    }

    fn delay_for(&self, n: u32) -> Duration {
        let secs = self.error_retry_interval as f64 * self.backoff_multiplier.powi(n as i32 - 1);
        Duration::from_secs_f64(secs.min(self.max_backoff_seconds as f64))
    }
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
