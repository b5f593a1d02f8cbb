// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

use thiserror::Error;

/// Errors surfaced by a [`crate::SourceDriver`] or [`crate::SenderDriver`]
/// implementation.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("session not found: {0}")]
    SessionNotFound(String),
    #[error("session obsoleted: {0}")]
    SessionObsoleted(String),
    #[error("source I/O error: {0}")]
    Io(String),
    #[error("protocol error: {0}")]
    Protocol(String),
}
