// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Opaque identifiers shared across the Event Arbitration Core.
//!
//! `SessionId` (spec §3) is a UUID and lives in [`crate::session`] since it
//! has different allocation requirements (minted independently by every
//! Fusion instance); everything here is an operator/config-assigned opaque
//! string wrapped with [`crate::define_id!`] for a consistent `Display`,
//! `Hash`, and `HashMap`-key-by-`&str` story.

crate::define_id! {
    /// Identifies a queryable view maintained by Fusion (e.g. a directory
    /// tree). Multiple Agents may serve the same view.
    pub struct ViewId("vew-");
}

crate::define_id! {
    /// Identifies a single (source, sender) pair inside an Agent's config.
    /// Combined with `agent_id` to form a session's `task_id`
    /// (`"agent_id:pipe_id"`, spec §3 "Session").
    pub struct PipeId("pip-");
}

crate::define_id! {
    /// Identifies the Agent process hosting one or more pipes.
    pub struct AgentId("agt-");
}

/// `task_id` identifying the (agent, pipe) pair that owns a session.
///
/// Not a `define_id!` newtype: it is always derived by formatting an
/// `AgentId` and `PipeId` together rather than generated or parsed on its
/// own, so it carries no independent prefix/length invariant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new(agent_id: &AgentId, pipe_id: &PipeId) -> Self {
        Self(format!("{agent_id}:{pipe_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
