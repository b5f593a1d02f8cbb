// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Clock abstractions: a testable physical clock, and the Logical Clock
//! (spec §4.1, C1) built on top of it.

use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// A clock that provides the current time. Generic code takes `C: Clock`
/// so tests can substitute [`FakeClock`] for deterministic skew/TTL math.
pub trait Clock: Clone + Send + Sync {
    /// Monotonic instant, for TTL/expiry arithmetic.
    fn now(&self) -> Instant;
    /// Wall-clock seconds since the epoch, as used by the Logical Clock's
    /// `reference_time` and by tombstone/suspect physical timestamps.
    fn epoch_secs(&self) -> f64;
}

/// Real system clock.
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_secs(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64()
    }
}

/// Fake clock for testing with controllable time.
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<Instant>>,
    epoch_secs: Arc<Mutex<f64>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            current: Arc::new(Mutex::new(Instant::now())),
            epoch_secs: Arc::new(Mutex::new(1_000_000.0)),
        }
    }

    /// Advance the clock by the given duration.
    pub fn advance(&self, duration: Duration) {
        *self.current.lock() += duration;
        *self.epoch_secs.lock() += duration.as_secs_f64();
    }

    /// Set the wall-clock epoch seconds directly (leaves the monotonic
    /// instant untouched — use when a test only cares about skew math).
    pub fn set_epoch_secs(&self, secs: f64) {
        *self.epoch_secs.lock() = secs;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        *self.current.lock()
    }

    fn epoch_secs(&self) -> f64 {
        *self.epoch_secs.lock()
    }
}

/// Capacity of the skew sample ring buffer (spec §3 "Clock sample").
const SKEW_BUFFER_CAPACITY: usize = 10_000;

/// Mode-based skew estimator producing a watermark `W = physical_now -
/// mode_skew` (spec §4.1, C1).
///
/// Only REALTIME events may sample skew (`can_sample_skew = true`);
/// SNAPSHOT and AUDIT events pass `false` so cold historical files don't
/// drag the watermark backward. A fixed-size window of integer-second
/// samples means a handful of rogue timestamps (`touch -d "year 2050"`)
/// can never outvote a mode backed by dozens of real samples.
pub struct LogicalClock<C: Clock = SystemClock> {
    physical: C,
    inner: Mutex<ClockState>,
}

struct ClockState {
    buffer: VecDeque<i64>,
    histogram: HashMap<i64, u32>,
    cached_mode: Option<i64>,
    dirty: bool,
}

impl Default for ClockState {
    fn default() -> Self {
        Self {
            buffer: VecDeque::with_capacity(SKEW_BUFFER_CAPACITY),
            histogram: HashMap::new(),
            cached_mode: None,
            dirty: false,
        }
    }
}

impl<C: Clock> LogicalClock<C> {
    pub fn new(physical: C) -> Self {
        Self { physical, inner: Mutex::new(ClockState::default()) }
    }

    /// Sample skew from an observed mtime (if eligible) and return the
    /// resulting watermark. `observed_mtime = None` (a pure-metadata/
    /// deletion event) skips sampling and just returns the watermark.
    pub fn update(&self, observed_mtime: Option<f64>, can_sample_skew: bool) -> f64 {
        let reference_time = self.physical.epoch_secs();

        if let Some(mtime) = observed_mtime {
            if can_sample_skew {
                let diff = (reference_time - mtime) as i64;
                let mut state = self.inner.lock();
                if state.buffer.len() == SKEW_BUFFER_CAPACITY {
                    if let Some(evicted) = state.buffer.pop_front() {
                        if let Some(count) = state.histogram.get_mut(&evicted) {
                            *count -= 1;
                            if *count == 0 {
                                state.histogram.remove(&evicted);
                            }
                        }
                    }
                }
                state.buffer.push_back(diff);
                *state.histogram.entry(diff).or_insert(0) += 1;
                state.dirty = true;
            }
        }

        self.now()
    }

    /// Current watermark: `physical_now - mode_skew`, or `physical_now`
    /// before the first sample (cold start).
    pub fn now(&self) -> f64 {
        let skew = self.mode_locked();
        self.physical.epoch_secs() - skew.unwrap_or(0) as f64
    }

    /// Current estimated skew (mode of the histogram), or 0 if no samples
    /// have been taken yet.
    pub fn skew(&self) -> i64 {
        self.mode_locked().unwrap_or(0)
    }

    /// Clear all samples, resetting to cold-start behavior.
    pub fn reset(&self) {
        let mut state = self.inner.lock();
        *state = ClockState::default();
    }

    /// Raw physical wall-clock seconds, bypassing skew correction. Used
    /// where spec text distinguishes `W` (watermark) from
    /// `physical_now()` — tombstone `physical_ts` and suspect-heap
    /// expiry both key off the latter.
    pub fn physical_epoch_secs(&self) -> f64 {
        self.physical.epoch_secs()
    }

    /// Raw monotonic instant, for suspect-heap expiry arithmetic.
    pub fn physical_instant(&self) -> std::time::Instant {
        self.physical.now()
    }

    fn mode_locked(&self) -> Option<i64> {
        let mut state = self.inner.lock();
        if !state.dirty {
            if let Some(cached) = state.cached_mode {
                return Some(cached);
            }
            if state.histogram.is_empty() {
                return None;
            }
        }

        let max_count = state.histogram.values().copied().max()?;
        // Tie-break: smallest skew wins (prefers lower apparent latency).
        let best = state
            .histogram
            .iter()
            .filter(|(_, count)| **count == max_count)
            .map(|(skew, _)| *skew)
            .min()?;

        state.cached_mode = Some(best);
        state.dirty = false;
        Some(best)
    }
}

impl LogicalClock<SystemClock> {
    /// Convenience constructor backed by the real system clock.
    pub fn system() -> Self {
        Self::new(SystemClock)
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
