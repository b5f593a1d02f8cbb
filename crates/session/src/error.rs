// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! `fustor-session`'s local error enum. Converts into
//! [`fustor_core::FustorError`] at crate boundaries per spec §7.

use fustor_core::FustorError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The session (or view) is gone — spec §7 `SessionObsoleted`: close
    /// the session and restart the pipe from the snapshot phase.
    #[error("session obsoleted: {0}")]
    Obsoleted(String),

    /// A second concurrent session for the same `task_id` was rejected
    /// because the view's `allow_concurrent_push` is false (SPEC_FULL
    /// §10.6 supplemented feature, modeled on the original's 409).
    #[error("task {0:?} already has an active session on this view")]
    TaskConflict(String),
}

impl From<SessionError> for FustorError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Obsoleted(msg) => FustorError::SessionObsoleted(msg),
            SessionError::TaskConflict(msg) => FustorError::Config(msg),
        }
    }
}
