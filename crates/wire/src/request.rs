// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

use crate::types::{ClientInfo, EventBatch, SentinelUpdate};
use serde::{Deserialize, Serialize};

/// A request from an Agent Pipe to a Fusion Pipe (spec §6 "Wire
/// protocol"). Framed as one JSON object tagged on `type`; the HTTP
/// binding maps each variant onto a method+path pair, but nothing here
/// depends on HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// `POST /session`. `task_id` is `"agent_id:pipe_id"`; the caller's
    /// `pipe_id` is otherwise resolved from the `X-API-Key` header,
    /// which this transport-agnostic request does not model.
    #[serde(rename = "session:create")]
    CreateSession {
        task_id: String,
        #[serde(default)]
        client_info: Option<ClientInfo>,
        #[serde(default)]
        session_timeout_seconds: Option<u64>,
    },

    /// `POST /session/{sid}/heartbeat`.
    #[serde(rename = "session:heartbeat")]
    Heartbeat {
        session_id: String,
        #[serde(default)]
        can_realtime: bool,
    },

    /// `DELETE /session/{sid}`.
    #[serde(rename = "session:terminate")]
    TerminateSession { session_id: String },

    /// `POST /ingest/{sid}/events`.
    #[serde(rename = "ingest:events")]
    Ingest { session_id: String, batch: EventBatch },

    /// `POST /consistency/audit/start`.
    #[serde(rename = "consistency:audit_start")]
    AuditStart { session_id: String },

    /// `POST /consistency/audit/end`. `task_id` validates the signal
    /// against the session that started it, if provided.
    #[serde(rename = "consistency:audit_end")]
    AuditEnd {
        session_id: String,
        #[serde(default)]
        task_id: Option<String>,
    },

    /// `GET /consistency/sentinel/tasks`.
    #[serde(rename = "consistency:sentinel_tasks")]
    SentinelTasks { session_id: String },

    /// `POST /consistency/sentinel/feedback`.
    #[serde(rename = "consistency:sentinel_feedback")]
    SentinelFeedback { session_id: String, updates: Vec<SentinelUpdate> },

    /// `GET /management/pipes`.
    #[serde(rename = "management:pipes")]
    ManagementPipes,

    /// `GET /management/pipes/{id}`.
    #[serde(rename = "management:pipe_detail")]
    ManagementPipeDetail { pipe_id: String },

    /// `GET /management/stats`.
    #[serde(rename = "management:stats")]
    ManagementStats,

    /// `POST /management/agents/{agent_id}/command`.
    #[serde(rename = "management:agent_command")]
    ManagementAgentCommand { agent_id: String, command: crate::types::Command },

    /// `POST /management/reload`.
    #[serde(rename = "management:reload")]
    ManagementReload,
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
