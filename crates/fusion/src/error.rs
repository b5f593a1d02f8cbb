// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

use fustor_session::SessionError;
use thiserror::Error;

/// Failures surfaced by [`crate::FusionHost`] (spec §7).
#[derive(Debug, Error)]
pub enum FusionError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("unknown pipe {0:?}")]
    UnknownPipe(String),

    #[error("pipe {0:?} is not mapped to a view")]
    PipeHasNoView(String),

    #[error("unknown view {0:?}")]
    UnknownView(String),

    #[error("config error: {0}")]
    Config(#[from] fustor_config::ConfigError),

    #[error("view worker is no longer running")]
    WorkerGone,

    #[error("malformed task_id {0:?}")]
    MalformedTaskId(String),
}
