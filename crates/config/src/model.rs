// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Strongly-typed configuration models matching spec §6 "Config file
//! shapes" exactly. `serde(default)` on every optional field so a
//! minimal YAML document still parses.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `logging?` block shared by both Agent and Fusion configs (expanded
/// per SPEC_FULL §10.2 — the ambient logging stack, not named
/// explicitly in spec §6 but implied by "logging?").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. `"info,fustor=debug"`.
    #[serde(default)]
    pub filter: Option<String>,
    /// Emit structured JSON lines instead of the human-readable format.
    #[serde(default)]
    pub json: bool,
}

/// One entry of `sources: {id: {...}}` (spec §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub driver: String,
    pub uri: String,
    #[serde(default)]
    pub credential: Option<String>,
    #[serde(default)]
    pub driver_params: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub disabled: bool,
}

/// One entry of `senders: {id: {...}}` (spec §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenderConfig {
    pub driver: String,
    pub uri: String,
    pub credential: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,
    #[serde(default)]
    pub disabled: bool,
}

fn default_batch_size() -> usize {
    100
}

fn default_timeout_sec() -> u64 {
    30
}

/// One entry of `pipes: {id: {...}}` (spec §6). Shared shape used by
/// both the Agent config (`source`/`sender` reference an Agent-local
/// id) and the Fusion config (same shape, referencing Fusion-local ids
/// plus `view`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeConfig {
    pub source: String,
    pub sender: String,
    /// Fusion-side view this pipe ultimately feeds. Absent in the Agent
    /// config's own copy (the Agent does not know which view it is
    /// aimed at beyond its sender's destination); present when the same
    /// shape is echoed inside a Fusion config's `pipes` map.
    #[serde(default)]
    pub view: Option<String>,
    #[serde(default)]
    pub fields_mapping: HashMap<String, String>,
    #[serde(default = "default_audit_interval")]
    pub audit_interval_sec: u64,
    #[serde(default = "default_sentinel_interval")]
    pub sentinel_interval_sec: u64,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default = "default_error_retry_interval")]
    pub error_retry_interval: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    #[serde(default = "default_max_backoff_seconds")]
    pub max_backoff_seconds: u64,
    #[serde(default = "default_max_consecutive_errors")]
    pub max_consecutive_errors: u32,
}

fn default_audit_interval() -> u64 {
    3600
}
fn default_sentinel_interval() -> u64 {
    300
}
fn default_error_retry_interval() -> u64 {
    1
}
fn default_backoff_multiplier() -> f64 {
    2.0
}
fn default_max_backoff_seconds() -> u64 {
    300
}
fn default_max_consecutive_errors() -> u32 {
    5
}

/// Agent host configuration (spec §6 "Config file shapes", Agent
/// config). Loaded from `${FUSTOR_HOME}/agent-config/*.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub fs_scan_workers: Option<usize>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub sources: IndexMap<String, SourceConfig>,
    #[serde(default)]
    pub senders: IndexMap<String, SenderConfig>,
    #[serde(default)]
    pub pipes: IndexMap<String, PipeConfig>,
}

/// One entry of a Fusion config's `views: {id: {...}}` — the queryable
/// in-memory view a set of pipes feeds (spec §1 "Fusion").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Human-readable view kind, e.g. `"fs_tree"`. The core only ships
    /// the directory-tree view; this is forward-looking per spec §1
    /// "most notably a directory tree of files".
    #[serde(default = "default_view_kind")]
    pub kind: String,
    /// Default session timeout for sessions attached to this view,
    /// unless a session requests a shorter one (spec §5 "Timeouts").
    #[serde(default = "default_session_timeout")]
    pub session_timeout_seconds: u64,
    /// Tombstone retention window (SPEC_FULL §10.6 supplemented
    /// feature; spec §4.4 step 2 names a fixed 1 hour).
    #[serde(default = "default_tombstone_ttl")]
    pub tombstone_ttl_seconds: u64,
    /// Reject a second concurrent session for the same `task_id`
    /// (SPEC_FULL §10.6 supplemented feature) instead of allowing a
    /// hot-standby follower under the same task.
    #[serde(default)]
    pub allow_concurrent_push: bool,
    /// Gate readers on `snapshot_complete` before serving queries
    /// (spec §4.5 "Snapshot-complete flag").
    #[serde(default = "default_true")]
    pub require_snapshot_complete: bool,
}

fn default_view_kind() -> String {
    "fs_tree".to_string()
}
fn default_session_timeout() -> u64 {
    30
}
fn default_tombstone_ttl() -> u64 {
    3600
}
fn default_true() -> bool {
    true
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            kind: default_view_kind(),
            session_timeout_seconds: default_session_timeout(),
            tombstone_ttl_seconds: default_tombstone_ttl(),
            allow_concurrent_push: false,
            require_snapshot_complete: true,
        }
    }
}

/// One entry of a Fusion config's `receivers: {id: {...}}` — the
/// transport endpoint (e.g. a Unix-socket or TCP listener) that accepts
/// Agent Pipe connections (spec §6 "Wire protocol ... HTTP binding is
/// one concrete realization").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiverConfig {
    pub driver: String,
    pub uri: String,
    #[serde(default)]
    pub credential: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

/// Fusion host configuration (spec §6), mirroring the Agent shape plus
/// `views`/`receivers`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FusionConfig {
    #[serde(default)]
    pub fusion_id: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub sources: IndexMap<String, SourceConfig>,
    #[serde(default)]
    pub senders: IndexMap<String, SenderConfig>,
    #[serde(default)]
    pub views: IndexMap<String, ViewConfig>,
    #[serde(default)]
    pub receivers: IndexMap<String, ReceiverConfig>,
    #[serde(default)]
    pub pipes: IndexMap<String, PipeConfig>,
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
