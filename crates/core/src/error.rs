// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! The error taxonomy shared across every `fustor-*` crate (spec §7).
//!
//! Each kind carries its own recovery policy; [`FustorError`] is the
//! envelope every crate's own `thiserror` enums eventually convert into
//! at a task or RPC boundary, so logs and management endpoints can
//! report a stable `kind` regardless of which crate raised it.

use thiserror::Error;

/// Why a component was marked `FAILED`/`DEGRADED` by the Supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FatalReason {
    /// `restart_count` reached `max_restarts` for this component.
    RestartsExhausted { restart_count: u32, max_restarts: u32 },
    /// The component reported itself unhealthy and its restart policy
    /// is `NEVER`.
    UnrecoverableHealthCheck,
}

impl std::fmt::Display for FatalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FatalReason::RestartsExhausted { restart_count, max_restarts } => write!(
                f,
                "restart budget exhausted ({restart_count}/{max_restarts} restarts used)"
            ),
            FatalReason::UnrecoverableHealthCheck => {
                write!(f, "component reported unhealthy and is not restartable")
            }
        }
    }
}

/// Taxonomy of error kinds from spec §7. Crate-local error enums
/// (`fustor-config::ConfigError`, `fustor-view::AuditAnomaly`, etc.)
/// implement `From<LocalError> for FustorError` rather than this crate
/// depending on every downstream crate's error type.
#[derive(Debug, Error)]
pub enum FustorError {
    /// Duplicate ID, missing required field, redundant (source, sender)
    /// pair. Policy: fail loudly at load, or reject the update command
    /// and restore the `.bak` backup.
    #[error("config error: {0}")]
    Config(String),

    /// Reference to an unknown source, sender, or view. Policy: reject
    /// at validation time; never panic.
    #[error("not found: {0}")]
    NotFound(String),

    /// The server returned 419 (or equivalent): this pipe's session
    /// lease is no longer valid. Policy: close the session and restart
    /// the pipe from the snapshot phase. Matched explicitly at task
    /// boundaries — never used for ordinary control flow.
    #[error("session obsoleted: {0}")]
    SessionObsoleted(String),

    /// Source/sender transient I/O failure. Policy: increment the
    /// data-plane error counter, apply exponential backoff, continue.
    #[error("driver error: {0}")]
    Driver(String),

    /// Heartbeat network failure. Policy: increment the control-plane
    /// error counter, apply exponential backoff, continue.
    #[error("control error: {0}")]
    Control(String),

    /// `parent_mtime` mismatch, or a path missing under its scanned
    /// parent. Policy: silently drop or record a blind-spot; never
    /// fatal.
    #[error("audit anomaly: {0}")]
    AuditAnomaly(String),

    /// Supervisor restart budget exhausted. Policy: mark the component
    /// DEGRADED; other components keep running.
    #[error("fatal: {0}")]
    Fatal(FatalReason),
}

impl FustorError {
    /// `true` for kinds that must close and restart the owning session
    /// (only [`FustorError::SessionObsoleted`]) — the one kind spec §7
    /// calls out as an exception-for-control-flow pattern.
    pub fn is_session_obsoleted(&self) -> bool {
        matches!(self, FustorError::SessionObsoleted(_))
    }

    /// `true` for kinds that should never take down the owning
    /// component: `AuditAnomaly` is always absorbed by the view worker,
    /// per spec §7 propagation rules.
    pub fn is_recoverable_anomaly(&self) -> bool {
        matches!(self, FustorError::AuditAnomaly(_))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
