// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Agent Pipe state bitmap (spec §4.6 "State bitmap"). `PAUSED` and
//! `RUNNING` are mutually exclusive; the phase bits
//! (`SNAPSHOT_SYNC`/`MESSAGE_SYNC`/`AUDIT_PHASE`/`SENTINEL_SWEEP`) may
//! overlay `RUNNING`.

use bitflags::bitflags;
use parking_lot::Mutex;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PipeState: u16 {
        const STOPPED       = 0b0000_0000_0001;
        const RUNNING       = 0b0000_0000_0010;
        const PAUSED        = 0b0000_0000_0100;
        const SNAPSHOT_SYNC = 0b0000_0000_1000;
        const MESSAGE_SYNC  = 0b0000_0001_0000;
        const AUDIT_PHASE   = 0b0000_0010_0000;
        const SENTINEL_SWEEP = 0b0000_0100_0000;
        const RECONNECTING  = 0b0000_1000_0000;
        const ERROR         = 0b0001_0000_0000;
    }
}

/// Thread-safe holder for a pipe's [`PipeState`], mutated from the
/// control loop, the data supervisor, and the sync tasks it spawns.
pub struct PipeStateCell(Mutex<PipeState>);

impl PipeStateCell {
    pub fn new(initial: PipeState) -> Self {
        Self(Mutex::new(initial))
    }

    pub fn get(&self) -> PipeState {
        *self.0.lock()
    }

    pub fn insert(&self, bits: PipeState) {
        self.0.lock().insert(bits);
    }

    pub fn remove(&self, bits: PipeState) {
        self.0.lock().remove(bits);
    }

    /// Replaces `PAUSED`/`RUNNING` atomically, preserving any phase
    /// bits already set (spec §4.6: phase bits overlay `RUNNING`).
    pub fn set_running(&self, running: bool) {
        let mut state = self.0.lock();
        state.remove(PipeState::PAUSED | PipeState::RUNNING | PipeState::STOPPED);
        state.insert(if running { PipeState::RUNNING } else { PipeState::PAUSED });
    }

    pub fn set_stopped(&self) {
        let mut state = self.0.lock();
        *state = PipeState::STOPPED;
    }

    pub fn contains(&self, bits: PipeState) -> bool {
        self.0.lock().contains(bits)
    }
}

impl Default for PipeStateCell {
    fn default() -> Self {
        Self::new(PipeState::STOPPED)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
