// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Tree plus the auxiliary sets from spec §3 "Global maps": tombstones,
//! suspects, and blind-spot bookkeeping. Owns the recursive delete
//! cascade spec'd for C2 since only here do both the tree and the
//! auxiliary sets it must clean up live together.

use crate::node::{NodePayload, NodeRef};
use crate::tree::Tree;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::time::Instant;

/// `(logical_ts, physical_ts)` recorded when a path is deleted. Both are
/// watermark-scale seconds (`W`, `physical_now()`), not integer skew.
pub type Tombstone = (f64, f64);

/// `(expiry_mono, recorded_mtime)` recorded while a node's freshness is
/// unverified.
pub type SuspectEntry = (Instant, f64);

pub struct ViewState {
    tree: Tree,
    tombstone_list: HashMap<String, Tombstone>,
    suspect_list: HashMap<String, SuspectEntry>,
    suspect_heap: BinaryHeap<std::cmp::Reverse<(Instant, String)>>,
    audit_seen_paths: HashSet<String>,
    blind_spot_additions: HashSet<String>,
    blind_spot_deletions: HashSet<String>,
    last_audit_start: Option<f64>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            tree: Tree::new(),
            tombstone_list: HashMap::new(),
            suspect_list: HashMap::new(),
            suspect_heap: BinaryHeap::new(),
            audit_seen_paths: HashSet::new(),
            blind_spot_additions: HashSet::new(),
            blind_spot_deletions: HashSet::new(),
            last_audit_start: None,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn get_node(&self, path: &str) -> Option<NodeRef<'_>> {
        self.tree.get_node(path)
    }

    /// Apply `payload` at `path`, type-switching (delete then recreate)
    /// if an existing node is the wrong kind (spec §4.2 invariant (b)).
    pub fn update_node(&mut self, path: &str, payload: NodePayload, last_updated_at: f64) {
        let existing_kind = self.tree.get_node(path).map(|n| n.kind());
        if let Some(existing) = existing_kind {
            if existing != payload.kind() {
                self.delete_node(path);
            }
        }
        self.tree.update_node(path, payload, last_updated_at);
    }

    /// Recursively removes `path` and, for directories, every
    /// descendant — from the tree, `suspect_list`, and both blind-spot
    /// sets. Never touches `tombstone_list` (spec §4.2). Root is
    /// rejected.
    pub fn delete_node(&mut self, path: &str) -> bool {
        if path == crate::path::ROOT {
            return false;
        }
        for child in self.tree.child_paths(path) {
            self.delete_node(&child);
        }
        let removed = self.tree.remove_single(path).is_some();
        if removed {
            self.suspect_list.remove(path);
            self.blind_spot_additions.remove(path);
            self.blind_spot_deletions.remove(path);
        }
        removed
    }

    // -- tombstones --

    pub fn tombstone(&self, path: &str) -> Option<Tombstone> {
        self.tombstone_list.get(path).copied()
    }

    pub fn set_tombstone(&mut self, path: &str, logical_ts: f64, physical_ts: f64) {
        self.tombstone_list.insert(path.to_string(), (logical_ts, physical_ts));
    }

    pub fn remove_tombstone(&mut self, path: &str) {
        self.tombstone_list.remove(path);
    }

    /// Removes every tombstone older than `ttl_seconds` (spec §4.4
    /// `handle_audit_end` step 2; default TTL 3600s per spec §4.4,
    /// configurable per `consistency.tombstone_ttl_seconds`).
    pub fn gc_tombstones(&mut self, physical_now: f64, ttl_seconds: f64) {
        self.tombstone_list.retain(|_, (_, physical_ts)| physical_now - *physical_ts <= ttl_seconds);
    }

    // -- suspects --

    pub fn suspect(&self, path: &str) -> Option<SuspectEntry> {
        self.suspect_list.get(path).copied()
    }

    pub fn is_suspect(&self, path: &str) -> bool {
        self.suspect_list.contains_key(path)
    }

    pub fn mark_suspect(&mut self, path: &str, expiry_mono: Instant, recorded_mtime: f64) {
        self.suspect_list.insert(path.to_string(), (expiry_mono, recorded_mtime));
        self.suspect_heap.push(std::cmp::Reverse((expiry_mono, path.to_string())));
        self.tree.set_integrity_suspect(path, true);
    }

    pub fn clear_suspect(&mut self, path: &str) {
        self.suspect_list.remove(path);
        self.tree.set_integrity_suspect(path, false);
    }

    /// Pops every heap entry whose expiry is `<= now`, returning the
    /// ones still current in `suspect_list` (stale entries left behind
    /// by a refreshed expiry are discarded silently — lazy deletion).
    pub fn take_expired_suspects(&mut self, now: Instant) -> Vec<String> {
        let mut expired = Vec::new();
        while let Some(std::cmp::Reverse((expiry, path))) = self.suspect_heap.peek().cloned() {
            if expiry > now {
                break;
            }
            self.suspect_heap.pop();
            if let Some((current_expiry, _)) = self.suspect_list.get(&path) {
                if *current_expiry <= now {
                    self.suspect_list.remove(&path);
                    self.tree.set_integrity_suspect(&path, false);
                    expired.push(path);
                }
            }
        }
        expired
    }

    // -- blind spots / audit bookkeeping --

    pub fn add_blind_spot_addition(&mut self, path: &str) {
        self.blind_spot_additions.insert(path.to_string());
    }

    pub fn add_blind_spot_deletion(&mut self, path: &str) {
        self.blind_spot_deletions.insert(path.to_string());
    }

    pub fn blind_spot_additions(&self) -> &HashSet<String> {
        &self.blind_spot_additions
    }

    pub fn blind_spot_deletions(&self) -> &HashSet<String> {
        &self.blind_spot_deletions
    }

    pub fn mark_audit_seen(&mut self, path: &str) {
        self.audit_seen_paths.insert(path.to_string());
    }

    pub fn audit_seen_paths(&self) -> &HashSet<String> {
        &self.audit_seen_paths
    }

    pub fn clear_audit_seen_paths(&mut self) {
        self.audit_seen_paths.clear();
    }

    pub fn last_audit_start(&self) -> Option<f64> {
        self.last_audit_start
    }

    pub fn set_last_audit_start(&mut self, ts: Option<f64>) {
        self.last_audit_start = ts;
    }

    pub fn has_children(&self, path: &str) -> bool {
        !self.tree.child_paths(path).is_empty()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
