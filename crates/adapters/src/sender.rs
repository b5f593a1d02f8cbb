// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! `SenderDriver`: the closed capability set an Agent Pipe needs from
//! whatever Fusion endpoint it reports to (spec §9 "Dynamic dispatch" —
//! connect, create_session, send batch, heartbeat, close). The wire
//! protocol (`fustor-wire`) and its HTTP binding are external
//! collaborators per §1 Non-goals; this crate only defines the trait and
//! an in-memory fake recorder used by `fustor-agent`'s tests and the
//! demo binaries.

use crate::error::AdapterError;
use async_trait::async_trait;
use fustor_core::SessionId;
use fustor_wire::{ClientInfo, Command, EventBatch, Role, SentinelTask, SentinelUpdate};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;

/// `POST /session` reply shape (spec §6 "Session").
#[derive(Debug, Clone, PartialEq)]
pub struct SessionInfo {
    pub session_id: SessionId,
    pub role: Role,
    pub timeout: Duration,
}

/// `POST /session/{sid}/heartbeat` reply shape (spec §6), already
/// resolved to the distinguished [`AdapterError::SessionObsoleted`]
/// where the wire status would have been 419.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeartbeatReply {
    pub role: Option<Role>,
    pub can_realtime: Option<bool>,
    pub commands: Vec<Command>,
}

/// Everything an Agent Pipe (C6) needs from the Fusion endpoint it
/// reports to: session lifecycle, batch transmission, and the
/// consistency sub-protocol (audit signals, sentinel tasks/feedback).
#[async_trait]
pub trait SenderDriver: Send + Sync {
    async fn create_session(
        &self,
        task_id: &str,
        client_info: ClientInfo,
        requested_timeout: Option<Duration>,
    ) -> Result<SessionInfo, AdapterError>;

    async fn heartbeat(
        &self,
        session_id: SessionId,
        can_realtime: bool,
    ) -> Result<HeartbeatReply, AdapterError>;

    /// Sends one batch. Returns the Fusion-side ack count. A 419-
    /// equivalent reply surfaces as `Err(AdapterError::SessionObsoleted)`.
    async fn send_batch(&self, session_id: SessionId, batch: EventBatch) -> Result<usize, AdapterError>;

    async fn signal_audit_start(&self, session_id: SessionId) -> Result<(), AdapterError>;

    async fn signal_audit_end(&self, session_id: SessionId) -> Result<(), AdapterError>;

    async fn get_sentinel_tasks(&self, session_id: SessionId) -> Result<Vec<SentinelTask>, AdapterError>;

    async fn submit_sentinel_results(
        &self,
        session_id: SessionId,
        updates: Vec<SentinelUpdate>,
    ) -> Result<(), AdapterError>;

    async fn close_session(&self, session_id: SessionId) -> Result<(), AdapterError>;

    /// `get_latest_committed_index()` (spec §4.6 "Leader, subsequent"):
    /// the message-stream position a promoted leader should resume
    /// `message_sync` from, rather than restarting snapshot.
    async fn get_latest_committed_index(&self, session_id: SessionId) -> Result<i64, AdapterError>;

    /// `sender.timeout_sec` (spec §5 "Timeouts"): hard timeout for a
    /// batch send.
    fn timeout_sec(&self) -> u64 {
        30
    }
}

/// In-memory [`SenderDriver`] that records every call for assertions and
/// replays seeded heartbeat replies/role changes. Used by
/// `fustor-agent`'s tests and the demo binaries in place of a real wire
/// connection to a Fusion host.
pub struct FakeSenderDriver {
    state: Mutex<FakeState>,
}

struct FakeState {
    next_role: Role,
    heartbeat_queue: VecDeque<HeartbeatReply>,
    sent_batches: Vec<EventBatch>,
    audit_starts: u32,
    audit_ends: u32,
    sentinel_tasks: Vec<SentinelTask>,
    sentinel_feedback: Vec<SentinelUpdate>,
    committed_index: i64,
    obsoleted: bool,
    closed_sessions: Vec<SessionId>,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            next_role: Role::Follower,
            heartbeat_queue: VecDeque::new(),
            sent_batches: Vec::new(),
            audit_starts: 0,
            audit_ends: 0,
            sentinel_tasks: Vec::new(),
            sentinel_feedback: Vec::new(),
            committed_index: 0,
            obsoleted: false,
            closed_sessions: Vec::new(),
        }
    }
}

impl FakeSenderDriver {
    pub fn new() -> Self {
        Self { state: Mutex::new(FakeState::default()) }
    }

    /// Makes the next (and all subsequent, until changed) `create_session`/
    /// `heartbeat` calls report this role.
    pub fn set_role(&self, role: Role) {
        self.state.lock().next_role = role;
    }

    /// Queues one heartbeat reply to be returned on the next `heartbeat`
    /// call; once the queue drains, calls fall back to `next_role`.
    pub fn queue_heartbeat_reply(&self, reply: HeartbeatReply) {
        self.state.lock().heartbeat_queue.push_back(reply);
    }

    /// Marks the sender as having obsoleted the session (419-equivalent):
    /// the next `heartbeat`/`send_batch` call returns
    /// `AdapterError::SessionObsoleted`.
    pub fn obsolete_session(&self) {
        self.state.lock().obsoleted = true;
    }

    pub fn set_committed_index(&self, index: i64) {
        self.state.lock().committed_index = index;
    }

    pub fn seed_sentinel_tasks(&self, tasks: Vec<SentinelTask>) {
        self.state.lock().sentinel_tasks = tasks;
    }

    pub fn sent_batches(&self) -> Vec<EventBatch> {
        self.state.lock().sent_batches.clone()
    }

    pub fn audit_start_count(&self) -> u32 {
        self.state.lock().audit_starts
    }

    pub fn audit_end_count(&self) -> u32 {
        self.state.lock().audit_ends
    }

    pub fn sentinel_feedback(&self) -> Vec<SentinelUpdate> {
        self.state.lock().sentinel_feedback.clone()
    }

    pub fn closed_sessions(&self) -> Vec<SessionId> {
        self.state.lock().closed_sessions.clone()
    }
}

impl Default for FakeSenderDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SenderDriver for FakeSenderDriver {
    async fn create_session(
        &self,
        _task_id: &str,
        _client_info: ClientInfo,
        requested_timeout: Option<Duration>,
    ) -> Result<SessionInfo, AdapterError> {
        let state = self.state.lock();
        Ok(SessionInfo {
            session_id: SessionId::new(),
            role: state.next_role,
            timeout: requested_timeout.unwrap_or(Duration::from_secs(30)),
        })
    }

    async fn heartbeat(
        &self,
        _session_id: SessionId,
        _can_realtime: bool,
    ) -> Result<HeartbeatReply, AdapterError> {
        let mut state = self.state.lock();
        if state.obsoleted {
            return Err(AdapterError::SessionObsoleted("fake sender marked obsolete".to_string()));
        }
        if let Some(queued) = state.heartbeat_queue.pop_front() {
            return Ok(queued);
        }
        Ok(HeartbeatReply { role: Some(state.next_role), can_realtime: None, commands: Vec::new() })
    }

    async fn send_batch(&self, _session_id: SessionId, batch: EventBatch) -> Result<usize, AdapterError> {
        let mut state = self.state.lock();
        if state.obsoleted {
            return Err(AdapterError::SessionObsoleted("fake sender marked obsolete".to_string()));
        }
        let count = batch.events.len();
        state.sent_batches.push(batch);
        Ok(count)
    }

    async fn signal_audit_start(&self, _session_id: SessionId) -> Result<(), AdapterError> {
        self.state.lock().audit_starts += 1;
        Ok(())
    }

    async fn signal_audit_end(&self, _session_id: SessionId) -> Result<(), AdapterError> {
        self.state.lock().audit_ends += 1;
        Ok(())
    }

    async fn get_sentinel_tasks(&self, _session_id: SessionId) -> Result<Vec<SentinelTask>, AdapterError> {
        Ok(self.state.lock().sentinel_tasks.clone())
    }

    async fn submit_sentinel_results(
        &self,
        _session_id: SessionId,
        updates: Vec<SentinelUpdate>,
    ) -> Result<(), AdapterError> {
        self.state.lock().sentinel_feedback.extend(updates);
        Ok(())
    }

    async fn close_session(&self, session_id: SessionId) -> Result<(), AdapterError> {
        self.state.lock().closed_sessions.push(session_id);
        Ok(())
    }

    async fn get_latest_committed_index(&self, _session_id: SessionId) -> Result<i64, AdapterError> {
        Ok(self.state.lock().committed_index)
    }
}

#[cfg(test)]
#[path = "sender_tests.rs"]
mod tests;
