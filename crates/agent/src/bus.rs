// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Event Bus & Remap (spec §4.8, C8). When multiple co-located pipes
//! share the same `source_config`, they share one [`EventBus`] instead
//! of each running its own source iterator: one pump task pulls
//! message batches and fans each row out to every subscriber's ring
//! buffer, keyed by `pipe_id`, via a `tokio::sync::broadcast` channel —
//! a bounded ring buffer is exactly what `broadcast` already is, and a
//! subscriber that falls behind its capacity naturally reports
//! `Lagged`, which is how a bus split's "positions diverge" trigger is
//! detected here.

use fustor_adapters::SourceDriver;
use fustor_core::{Event, PipeId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Ring buffer depth. A subscriber more than this many batches behind
/// the pump is lagged; the split path treats lagged subscribers as
/// candidates for `needed_position_lost = true`.
pub const DEFAULT_BUS_CAPACITY: usize = 1024;

const PUMP_IDLE_SLEEP: Duration = Duration::from_millis(200);

/// A pipe's live handle on a shared [`EventBus`] (spec §4.8
/// "per-subscriber" position counters).
pub struct BusSubscription {
    pipe_id: PipeId,
    position: Arc<AtomicI64>,
    receiver: broadcast::Receiver<Arc<Event>>,
}

impl BusSubscription {
    pub fn pipe_id(&self) -> PipeId {
        self.pipe_id
    }

    pub fn position(&self) -> i64 {
        self.position.load(Ordering::Relaxed)
    }

    /// Awaits the next fanned-out event. `Lagged(n)` means this
    /// subscriber fell `n` batches behind the ring buffer's retained
    /// window (spec §4.8 split trigger); the caller should treat that
    /// as `needed_position_lost = true` for a subsequent
    /// `remap_to_new_bus`.
    pub async fn recv(&mut self) -> Result<Arc<Event>, broadcast::error::RecvError> {
        let event = self.receiver.recv().await?;
        self.position.store(event.index, Ordering::Relaxed);
        Ok(event)
    }
}

/// One shared source iterator and logical clock, fanned out to every
/// co-located pipe that reads the same `source_config` (spec §4.8).
pub struct EventBus<S: SourceDriver + 'static> {
    source: Arc<S>,
    sender: broadcast::Sender<Arc<Event>>,
    positions: Mutex<HashMap<PipeId, Arc<AtomicI64>>>,
    batch_size: usize,
    start_position: AtomicI64,
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl<S: SourceDriver + 'static> EventBus<S> {
    pub fn new(source: Arc<S>, batch_size: usize, start_position: i64) -> Arc<Self> {
        let (sender, _) = broadcast::channel(DEFAULT_BUS_CAPACITY);
        Arc::new(Self {
            source,
            sender,
            positions: Mutex::new(HashMap::new()),
            batch_size: batch_size.max(1),
            start_position: AtomicI64::new(start_position),
            pump: Mutex::new(None),
        })
    }

    /// Registers `pipe_id` as a subscriber starting from
    /// `from_position`. A pipe migrated here via `remap_to_new_bus`
    /// with `needed_position_lost = false` passes its last known
    /// position; one with `needed_position_lost = true` passes the
    /// bus's retained floor instead, since its own position no longer
    /// exists on this bus.
    pub fn subscribe(&self, pipe_id: PipeId, from_position: i64) -> BusSubscription {
        let position = Arc::new(AtomicI64::new(from_position));
        self.positions.lock().insert(pipe_id, Arc::clone(&position));
        BusSubscription { pipe_id, position, receiver: self.sender.subscribe() }
    }

    pub fn unsubscribe(&self, pipe_id: &PipeId) {
        self.positions.lock().remove(pipe_id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.positions.lock().len()
    }

    /// Starts the pump task (spec §4.8: "one source iterator"); a
    /// no-op if already running.
    pub fn start(self: &Arc<Self>) {
        let mut pump = self.pump.lock();
        if pump.is_some() {
            return;
        }
        let bus = Arc::clone(self);
        *pump = Some(tokio::spawn(async move { bus.pump_loop().await }));
    }

    pub fn stop(&self) {
        if let Some(handle) = self.pump.lock().take() {
            handle.abort();
        }
    }

    async fn pump_loop(&self) {
        loop {
            let position = self.start_position.load(Ordering::Relaxed);
            match self.source.next_message_batch(position, self.batch_size).await {
                Ok(Some(event)) => {
                    self.start_position.store(event.index, Ordering::Relaxed);
                    // No subscribers currently listening is not a bus fault.
                    let _ = self.sender.send(Arc::new(event));
                }
                Ok(None) => tokio::time::sleep(PUMP_IDLE_SLEEP).await,
                Err(err) => {
                    tracing::warn!(error = %err, "event bus source error");
                    tokio::time::sleep(PUMP_IDLE_SLEEP).await;
                }
            }
        }
    }

    /// Subscribers whose position is behind `retained_floor` (spec
    /// §4.8: "original bus B retains the older window"; a split's new
    /// bus B' only covers the window from `retained_floor` onward).
    /// These pipes need `remap_to_new_bus(b_prime, true)`; the rest get
    /// `remap_to_new_bus(b_prime, false)`.
    pub fn subscribers_needing_resnapshot(&self, retained_floor: i64) -> Vec<PipeId> {
        self.positions
            .lock()
            .iter()
            .filter(|(_, pos)| pos.load(Ordering::Relaxed) < retained_floor)
            .map(|(id, _)| *id)
            .collect()
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
