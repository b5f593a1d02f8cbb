// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Audit epoch bookkeeping (spec §4.4, C4). `handle_audit_start` and
//! `handle_audit_end` bracket an audit sweep started by an Agent Pipe's
//! `trigger_audit()`; everything in between is driven through
//! [`crate::arbitrator::Arbitrator`] rows tagged `message_source =
//! AUDIT`.

use crate::state::ViewState;

/// Default tombstone retention before `handle_audit_end`'s garbage
/// collection pass reclaims it (spec §4.4 step 2).
pub const DEFAULT_TOMBSTONE_TTL_SECS: f64 = 3600.0;

pub struct AuditManager {
    pub tombstone_ttl_secs: f64,
}

impl Default for AuditManager {
    fn default() -> Self {
        Self { tombstone_ttl_secs: DEFAULT_TOMBSTONE_TTL_SECS }
    }
}

impl AuditManager {
    pub fn new(tombstone_ttl_secs: f64) -> Self {
        Self { tombstone_ttl_secs }
    }

    /// Idempotent: if an epoch is already open (late-signal protection),
    /// leave `last_audit_start` and any `audit_seen_paths` collected so
    /// far untouched.
    pub fn handle_audit_start(&self, state: &mut ViewState, w: f64) {
        if state.last_audit_start().is_none() {
            state.set_last_audit_start(Some(w));
        }
    }

    /// Closes the epoch: reconciles blind-spot deletions against
    /// `audit_seen_paths`, garbage-collects stale tombstones, then
    /// clears epoch state. Never fails — every step is defensive.
    pub fn handle_audit_end(&self, state: &mut ViewState, physical_now: f64) {
        let Some(last_audit_start) = state.last_audit_start() else {
            // No open epoch; nothing to reconcile, but still GC tombstones.
            state.gc_tombstones(physical_now, self.tombstone_ttl_secs);
            return;
        };

        let scanned_dirs: Vec<String> = state.audit_seen_paths().iter().cloned().collect();
        let mut to_delete = Vec::new();
        for dir in &scanned_dirs {
            for child in state.tree().child_paths(dir) {
                if state.audit_seen_paths().contains(&child) {
                    continue;
                }
                let Some(node) = state.get_node(&child) else { continue };
                if node.last_updated_at() > last_audit_start {
                    // Rule 3: created by a REALTIME event during the audit
                    // window; the audit simply missed it.
                    continue;
                }
                if state.tombstone(&child).is_some() {
                    continue;
                }
                to_delete.push(child);
            }
        }
        for path in to_delete {
            state.delete_node(&path);
            state.add_blind_spot_deletion(&path);
        }

        state.gc_tombstones(physical_now, self.tombstone_ttl_secs);

        state.clear_audit_seen_paths();
        state.set_last_audit_start(None);
    }
}

#[cfg(test)]
#[path = "audit_tests.rs"]
mod tests;
