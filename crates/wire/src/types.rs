// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Payload types shared between [`crate::Request`] and [`crate::Response`].

use fustor_core::{Event, MessageSource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Optional free-form client metadata attached to `create_session`
/// (spec §6 "Session").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Role assigned to a session by the Session & Role Manager (spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Leader,
    Follower,
}

fustor_core::simple_display! {
    Role {
        Leader => "leader",
        Follower => "follower",
    }
}

/// `source_type` tag on an ingest batch (spec §6 "Ingest").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Message,
    Snapshot,
    Audit,
    ScanComplete,
}

impl From<SourceType> for MessageSource {
    fn from(value: SourceType) -> Self {
        match value {
            SourceType::Message => MessageSource::Realtime,
            SourceType::Snapshot => MessageSource::Snapshot,
            SourceType::Audit => MessageSource::Audit,
            // scan_complete batches carry no tree-affecting rows.
            SourceType::ScanComplete => MessageSource::Realtime,
        }
    }
}

/// A pending command delivered to an Agent in a heartbeat reply (spec
/// §4.6 "Commands"). Every variant's fields mirror the command's YAML
/// payload exactly so Agent and Fusion share one serde shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum Command {
    #[serde(rename = "scan")]
    Scan { path: String, recursive: bool, job_id: String },

    #[serde(rename = "reload_config")]
    ReloadConfig,

    #[serde(rename = "stop_pipe")]
    StopPipe { pipe_id: String },

    #[serde(rename = "update_config")]
    UpdateConfig { config_yaml: String, filename: String },

    #[serde(rename = "report_config")]
    ReportConfig { filename: String },

    #[serde(rename = "upgrade")]
    Upgrade { version: String },
}

/// One entry of `GET /consistency/sentinel/tasks` (spec §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentinelTask {
    pub path: String,
    pub expected_mtime: f64,
}

/// One entry of `POST /consistency/sentinel/feedback`'s `updates` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentinelUpdate {
    pub path: String,
    pub mtime: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Per-pipe counters surfaced by `/management/stats` (spec §6).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipeStats {
    pub pipe_id: String,
    pub events_received: u64,
    pub events_processed: u64,
    pub errors: u64,
}

/// Summary entry returned by `/management/pipes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeSummary {
    pub pipe_id: String,
    pub source: String,
    pub sender: String,
    pub disabled: bool,
}

/// One batch of events carried by `POST /ingest/{sid}/events` (spec §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventBatch {
    pub events: Vec<Event>,
    pub source_type: SourceType,
    #[serde(default)]
    pub is_end: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
