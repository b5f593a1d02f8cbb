// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! A single session's bookkeeping (spec §3 "Session").

use fustor_core::ids::TaskId;
use fustor_core::SessionId;
use fustor_wire::{ClientInfo, Role};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub task_id: TaskId,
    pub client_info: ClientInfo,
    pub last_heartbeat: Instant,
    pub timeout: Duration,
    pub snapshot_complete: bool,
}

impl SessionRecord {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.last_heartbeat) >= self.timeout
    }
}

/// Per-view leader election state plus its session registry.
#[derive(Default)]
pub struct ViewSessions {
    pub(crate) sessions: std::collections::HashMap<SessionId, SessionRecord>,
    pub(crate) authoritative_session_id: Option<SessionId>,
}

impl ViewSessions {
    pub fn role_of(&self, session_id: &SessionId) -> Role {
        if self.authoritative_session_id.as_ref() == Some(session_id) {
            Role::Leader
        } else {
            Role::Follower
        }
    }
}
