// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Per-view single-writer worker (spec §4.7 "Per-pipe event queue"): a
//! bounded channel decouples `ingest` from the view's application
//! latency so a slow view never stalls a session's heartbeat. Every
//! pipe feeding the same view shares one [`ViewWorker`], which keeps
//! the mutation serialized through its drain task (spec §5 "Per-view
//! single-writer").

use crate::FusionError;
use fustor_core::Event;
use fustor_view::{NodeKind, View};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Default bound on the per-view ingest queue (spec §4.7 `queue_batch_size`).
pub const DEFAULT_QUEUE_BATCH_SIZE: usize = 100;

enum WorkItem {
    Process(Box<Event>),
    AuditEnd,
    UpdateSuspect { path: String, mtime: f64 },
}

#[derive(Clone)]
pub struct ViewWorker {
    view: Arc<Mutex<View>>,
    tx: mpsc::Sender<WorkItem>,
}

impl ViewWorker {
    pub fn spawn(view: View) -> Self {
        Self::spawn_with_capacity(view, DEFAULT_QUEUE_BATCH_SIZE)
    }

    pub fn spawn_with_capacity(view: View, capacity: usize) -> Self {
        let view = Arc::new(Mutex::new(view));
        let (tx, mut rx) = mpsc::channel::<WorkItem>(capacity);
        let worker_view = Arc::clone(&view);
        tokio::spawn(async move {
            while let Some(item) = rx.recv().await {
                let mut view = worker_view.lock();
                match item {
                    WorkItem::Process(event) => view.process_event(&event),
                    WorkItem::AuditEnd => view.handle_audit_end(),
                    WorkItem::UpdateSuspect { path, mtime } => view.update_suspect(&path, mtime),
                }
            }
        });
        Self { view, tx }
    }

    /// Enqueues an event for in-order application. Returns once
    /// enqueued, not once applied (spec §4.7 "decouples transport from
    /// application latency").
    pub async fn enqueue(&self, event: Event) -> Result<(), FusionError> {
        self.tx.send(WorkItem::Process(Box::new(event))).await.map_err(|_| FusionError::WorkerGone)
    }

    pub async fn close_audit(&self) -> Result<(), FusionError> {
        self.tx.send(WorkItem::AuditEnd).await.map_err(|_| FusionError::WorkerGone)
    }

    pub async fn feed_suspect(&self, path: String, mtime: f64) -> Result<(), FusionError> {
        self.tx
            .send(WorkItem::UpdateSuspect { path, mtime })
            .await
            .map_err(|_| FusionError::WorkerGone)
    }

    /// `handle_audit_start` is idempotent and Agents only call it once
    /// per epoch, so it is applied directly under the lock rather than
    /// routed through the queue.
    pub fn open_audit(&self) {
        self.view.lock().handle_audit_start();
    }

    pub fn node_kind(&self, path: &str) -> Option<NodeKind> {
        self.view.lock().get_node(path).map(|n| n.kind())
    }

    pub fn take_expired_suspects(&self) -> Vec<String> {
        self.view.lock().take_expired_suspects()
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
