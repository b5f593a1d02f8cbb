// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! `SourceDriver`: the closed capability set an Agent Pipe needs from
//! whatever is being watched (spec §9 "Dynamic dispatch" — iterate
//! snapshot, iterate message, iterate audit, sentinel check). Real
//! probing (inotify, S3 listing, ...) is an external collaborator per
//! §1 Non-goals; this crate only defines the trait and an in-memory
//! fake driven by pre-seeded rows, used by tests and the demo binaries.

use crate::error::AdapterError;
use async_trait::async_trait;
use fustor_core::Event;
use fustor_wire::SentinelTask;

/// Pull-based source of FS events, one batch per call. `None` signals
/// iterator exhaustion (spec §4.6 "Snapshot sync": "At iterator
/// exhaustion, send empty batch with `is_end=true`" — the caller is
/// responsible for emitting that terminal batch once this returns
/// `None`).
#[async_trait]
pub trait SourceDriver: Send + Sync {
    async fn next_snapshot_batch(&self, batch_size: usize) -> Result<Option<Event>, AdapterError>;

    async fn next_message_batch(
        &self,
        start_position: i64,
        batch_size: usize,
    ) -> Result<Option<Event>, AdapterError>;

    async fn next_audit_batch(&self, batch_size: usize) -> Result<Option<Event>, AdapterError>;

    /// One batch of an on-demand scan rooted at `path` (spec §4.6
    /// "Commands" `scan{path, recursive, job_id}`), reusing the same
    /// row shape and batching discipline as `next_snapshot_batch`.
    async fn next_scan_batch(
        &self,
        path: &str,
        recursive: bool,
        batch_size: usize,
    ) -> Result<Option<Event>, AdapterError>;

    /// One stability re-check per requested path (spec §4.6 "Sentinel").
    async fn perform_sentinel_check(
        &self,
        tasks: &[SentinelTask],
    ) -> Result<Vec<(String, f64)>, AdapterError>;
}

pub mod fake;
pub use fake::FakeSourceDriver;

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
