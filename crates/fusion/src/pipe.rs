// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! One entry of a Fusion config's `pipes` map, resolved to the
//! [`crate::worker::ViewWorker`] it feeds, plus the counters
//! `/management/stats` surfaces (spec §4.7, SPEC_FULL §10.6(c)).

use crate::worker::ViewWorker;
use fustor_core::ids::ViewId;
use fustor_wire::{PipeStats, PipeSummary};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
struct Counters {
    events_received: AtomicU64,
    events_processed: AtomicU64,
    errors: AtomicU64,
}

pub struct PipeEntry {
    pub pipe_id: String,
    pub source: String,
    pub sender: String,
    pub disabled: bool,
    pub view_id: ViewId,
    pub view: ViewWorker,
    counters: Counters,
}

impl PipeEntry {
    pub fn new(
        pipe_id: String,
        source: String,
        sender: String,
        disabled: bool,
        view_id: ViewId,
        view: ViewWorker,
    ) -> Self {
        Self { pipe_id, source, sender, disabled, view_id, view, counters: Counters::default() }
    }

    pub fn record_received(&self, count: u64) {
        self.counters.events_received.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_processed(&self, count: u64) {
        self.counters.events_processed.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.counters.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self) -> PipeStats {
        PipeStats {
            pipe_id: self.pipe_id.clone(),
            events_received: self.counters.events_received.load(Ordering::Relaxed),
            events_processed: self.counters.events_processed.load(Ordering::Relaxed),
            errors: self.counters.errors.load(Ordering::Relaxed),
        }
    }

    pub fn summary(&self) -> PipeSummary {
        PipeSummary {
            pipe_id: self.pipe_id.clone(),
            source: self.source.clone(),
            sender: self.sender.clone(),
            disabled: self.disabled,
        }
    }
}
