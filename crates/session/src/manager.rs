// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Session & Role Manager (spec §4.5, C5): per-view session registry,
//! cooperative leader election via compare-and-set on
//! `authoritative_session_id`, and the background heartbeat sweep.

use crate::error::SessionError;
use crate::record::{SessionRecord, ViewSessions};
use fustor_core::ids::{TaskId, ViewId};
use fustor_core::SessionId;
use fustor_wire::{ClientInfo, Role};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default interval between heartbeat-timeout sweeps (spec §4.5).
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(5);

pub struct SessionManager {
    views: Mutex<HashMap<ViewId, ViewSessions>>,
    default_session_timeout: Duration,
    cleanup_interval: Duration,
}

impl SessionManager {
    pub fn new(default_session_timeout: Duration) -> Self {
        Self {
            views: Mutex::new(HashMap::new()),
            default_session_timeout,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }

    pub fn with_cleanup_interval(default_session_timeout: Duration, cleanup_interval: Duration) -> Self {
        Self { views: Mutex::new(HashMap::new()), default_session_timeout, cleanup_interval }
    }

    /// Registers a new session for `view_id`. The effective timeout is
    /// `min(requested, default)` (spec §5 "Timeouts"). Attempts CAS onto
    /// `authoritative_session_id`; the winner is leader.
    ///
    /// When `allow_concurrent_push` is false (the common case) and this
    /// view already has a live session with the same `task_id`, the
    /// request is rejected with [`SessionError::TaskConflict`] (SPEC_FULL
    /// §10.6 supplemented feature) rather than registering a second
    /// session for the same (agent, pipe) pair.
    pub fn create_session(
        &self,
        view_id: ViewId,
        task_id: TaskId,
        client_info: ClientInfo,
        requested_timeout: Option<Duration>,
        allow_concurrent_push: bool,
        now: Instant,
    ) -> Result<(SessionId, Role, Duration), SessionError> {
        let timeout = match requested_timeout {
            Some(requested) => requested.min(self.default_session_timeout),
            None => self.default_session_timeout,
        };
        let session_id = SessionId::new();
        let mut views = self.views.lock();
        let view = views.entry(view_id).or_default();

        if !allow_concurrent_push && view.sessions.values().any(|r| r.task_id == task_id) {
            return Err(SessionError::TaskConflict(task_id.to_string()));
        }

        view.sessions.insert(
            session_id,
            SessionRecord {
                session_id,
                task_id,
                client_info,
                last_heartbeat: now,
                timeout,
                snapshot_complete: false,
            },
        );
        if view.authoritative_session_id.is_none() {
            view.authoritative_session_id = Some(session_id);
        }
        let role = view.role_of(&session_id);
        Ok((session_id, role, timeout))
    }

    /// Records a heartbeat and returns the session's current role. A
    /// follower with `can_realtime = true` may claim an empty
    /// authoritative slot (leader died) and become leader on this call.
    pub fn heartbeat(
        &self,
        view_id: &ViewId,
        session_id: SessionId,
        can_realtime: bool,
        now: Instant,
    ) -> Result<Role, SessionError> {
        let mut views = self.views.lock();
        let view = views
            .get_mut(view_id)
            .ok_or_else(|| SessionError::Obsoleted(session_id.to_string()))?;
        let record = view
            .sessions
            .get_mut(&session_id)
            .ok_or_else(|| SessionError::Obsoleted(session_id.to_string()))?;
        record.last_heartbeat = now;

        if can_realtime && view.authoritative_session_id.is_none() {
            view.authoritative_session_id = Some(session_id);
        }
        Ok(view.role_of(&session_id))
    }

    /// Removes a session. If it held leadership, clears the
    /// authoritative slot; promotion happens lazily on the next
    /// `can_realtime` heartbeat from a follower, not pushed here.
    pub fn terminate_session(&self, view_id: &ViewId, session_id: SessionId) {
        let mut views = self.views.lock();
        let Some(view) = views.get_mut(view_id) else { return };
        view.sessions.remove(&session_id);
        if view.authoritative_session_id == Some(session_id) {
            view.authoritative_session_id = None;
        }
    }

    /// Marks snapshot completion for `session_id`, but only if it is
    /// the view's leader (spec §4.5 "Snapshot-complete flag" — follower
    /// snapshot-end signals are ignored).
    pub fn set_snapshot_complete(&self, view_id: &ViewId, session_id: SessionId) -> bool {
        let mut views = self.views.lock();
        let Some(view) = views.get_mut(view_id) else { return false };
        if view.authoritative_session_id != Some(session_id) {
            return false;
        }
        if let Some(record) = view.sessions.get_mut(&session_id) {
            record.snapshot_complete = true;
            return true;
        }
        false
    }

    pub fn is_snapshot_complete(&self, view_id: &ViewId) -> bool {
        let views = self.views.lock();
        views
            .get(view_id)
            .and_then(|view| view.authoritative_session_id.and_then(|id| view.sessions.get(&id)))
            .is_some_and(|record| record.snapshot_complete)
    }

    pub fn role(&self, view_id: &ViewId, session_id: &SessionId) -> Option<Role> {
        let views = self.views.lock();
        views.get(view_id).map(|view| view.role_of(session_id))
    }

    /// Terminates every session whose heartbeat has lapsed, returning
    /// the `(view_id, session_id)` pairs removed.
    pub fn sweep_expired(&self, now: Instant) -> Vec<(ViewId, SessionId)> {
        let mut expired = Vec::new();
        let mut views = self.views.lock();
        for (view_id, view) in views.iter_mut() {
            let stale: Vec<SessionId> = view
                .sessions
                .values()
                .filter(|record| record.is_expired(now))
                .map(|record| record.session_id)
                .collect();
            for session_id in stale {
                view.sessions.remove(&session_id);
                if view.authoritative_session_id == Some(session_id) {
                    view.authoritative_session_id = None;
                }
                expired.push((view_id.clone(), session_id));
            }
        }
        expired
    }

    pub fn cleanup_interval(&self) -> Duration {
        self.cleanup_interval
    }

    /// Background sweep task (spec §4.5): runs until the process exits.
    /// Intended to be spawned once per Fusion host via `tokio::spawn`.
    pub async fn run_cleanup_loop(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.cleanup_interval);
        loop {
            ticker.tick().await;
            let expired = self.sweep_expired(Instant::now());
            for (view_id, session_id) in expired {
                tracing::info!(%view_id, %session_id, "session heartbeat timeout, terminated");
            }
        }
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
