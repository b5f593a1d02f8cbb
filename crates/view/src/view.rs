// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Top-level `View`: Logical Clock + tree/auxiliary state + Arbitrator +
//! Audit Manager wired together into the single entry point a Fusion
//! Pipe's per-view worker owns and drives single-writer (spec §5
//! "Per-view single-writer").

use crate::arbitrator::Arbitrator;
use crate::audit::AuditManager;
use crate::node::NodeRef;
use crate::state::ViewState;
use fustor_core::{Clock, Event, LogicalClock, SystemClock};

pub struct View<C: Clock = SystemClock> {
    clock: LogicalClock<C>,
    state: ViewState,
    arbitrator: Arbitrator,
    audit: AuditManager,
}

impl View<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for View<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> View<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock: LogicalClock::new(clock),
            state: ViewState::new(),
            arbitrator: Arbitrator::default(),
            audit: AuditManager::default(),
        }
    }

    pub fn with_components(clock: C, arbitrator: Arbitrator, audit: AuditManager) -> Self {
        Self { clock: LogicalClock::new(clock), state: ViewState::new(), arbitrator, audit }
    }

    /// Samples skew from the event's first row (if eligible), computes
    /// the watermark, and runs the C3 merge pipeline.
    pub fn process_event(&mut self, event: &Event) {
        let observed_mtime = event.fs_rows().first().map(|r| r.modified_time);
        let w = self.clock.update(observed_mtime, event.message_source.can_sample_skew());
        let physical_now = self.clock.physical_epoch_secs();
        let physical_instant = self.clock.physical_instant();
        self.arbitrator.process_event(&mut self.state, w, physical_now, physical_instant, event);
    }

    pub fn handle_audit_start(&mut self) {
        let w = self.clock.now();
        self.audit.handle_audit_start(&mut self.state, w);
    }

    pub fn handle_audit_end(&mut self) {
        let physical_now = self.clock.physical_epoch_secs();
        self.audit.handle_audit_end(&mut self.state, physical_now);
    }

    /// Sentinel feedback (spec §4.3 step 9): reconcile a stability
    /// report against the recorded suspect entry.
    pub fn update_suspect(&mut self, path: &str, mtime: f64) {
        let w = self.clock.now();
        let physical_instant = self.clock.physical_instant();
        self.arbitrator.update_suspect(&mut self.state, w, physical_instant, path, mtime);
    }

    /// Expired suspects ready for a sentinel sweep to re-check.
    pub fn take_expired_suspects(&mut self) -> Vec<String> {
        let now = self.clock.physical_instant();
        self.state.take_expired_suspects(now)
    }

    pub fn get_node(&self, path: &str) -> Option<NodeRef<'_>> {
        self.state.get_node(path)
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn clock(&self) -> &LogicalClock<C> {
        &self.clock
    }
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
