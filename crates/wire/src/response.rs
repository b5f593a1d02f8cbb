// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

use crate::types::{Command, PipeStats, PipeSummary, Role, SentinelTask};
use serde::{Deserialize, Serialize};

/// A reply from a Fusion Pipe to an Agent Pipe (spec §6). Status `419`
/// (or equivalent) is modeled as [`Response::SessionObsoleted`] rather
/// than a raw numeric code, per the error taxonomy in spec §7.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    /// Generic success with no payload.
    Ok,

    /// `POST /session` reply.
    #[serde(rename = "session:created")]
    SessionCreated {
        session_id: String,
        role: Role,
        session_timeout_seconds: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// `POST /session/{sid}/heartbeat` reply. `role` always reflects the
    /// current `authoritative_session_id` at reply time (spec §4.7).
    #[serde(rename = "session:heartbeat_ack")]
    HeartbeatAck {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<Role>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        commands: Vec<Command>,
    },

    /// This session's lease is no longer valid (spec §7
    /// `SessionObsoleted`, wire status 419). The Agent must close the
    /// session and restart the pipe from the snapshot phase.
    #[serde(rename = "session:obsoleted")]
    SessionObsoleted,

    /// `POST /ingest/{sid}/events` reply.
    #[serde(rename = "ingest:ack")]
    IngestAck { count: usize },

    /// `GET /consistency/sentinel/tasks` reply.
    #[serde(rename = "consistency:sentinel_tasks")]
    SentinelTasks { paths: Vec<SentinelTask> },

    /// `GET /management/pipes` reply.
    #[serde(rename = "management:pipes")]
    ManagementPipes { pipes: Vec<PipeSummary> },

    /// `GET /management/pipes/{id}` reply.
    #[serde(rename = "management:pipe_detail")]
    ManagementPipeDetail { pipe: Option<PipeSummary> },

    /// `GET /management/stats` reply.
    #[serde(rename = "management:stats")]
    ManagementStats { stats: Vec<PipeStats> },

    /// Request rejected (spec §7 `ConfigError`/`NotFoundError`).
    Error { message: String },
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
