// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fustor-fusion: the Fusion Pipe (C7). Wires the Session & Role
//! Manager (C5) and per-view [`fustor_view::View`] into one
//! [`FusionHost`] that a receiver (the transport binding in front of
//! it, left external per spec §1 Non-goals) dispatches decoded wire
//! requests to.

mod error;
mod host;
mod pipe;
mod worker;

pub use error::FusionError;
pub use host::{FusionHost, ScanCompleteHandler};
pub use pipe::PipeEntry;
pub use worker::{ViewWorker, DEFAULT_QUEUE_BATCH_SIZE};
