// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

use fustor_adapters::AdapterError;
use fustor_config::ConfigError;
use thiserror::Error;

/// Failures surfaced by [`crate::AgentPipe`] (spec §7).
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("pipe has no active session")]
    NoSession,

    #[error("session obsoleted, restart from snapshot")]
    SessionObsoleted,

    #[error("max_restarts exceeded for component {0:?}, marked degraded")]
    Degraded(String),
}
