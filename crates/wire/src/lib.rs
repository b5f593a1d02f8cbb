// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Wire protocol between Agent Pipes and Fusion Pipes (spec §6).
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload. The
//! protocol itself is transport-agnostic; HTTP is one binding of it and
//! is not modeled here (spec §1 Non-goals).

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod request;
mod response;
mod types;
mod wire;

pub use request::Request;
pub use response::Response;
pub use types::{
    ClientInfo, Command, EventBatch, PipeStats, PipeSummary, Role, SentinelTask, SentinelUpdate,
    SourceType,
};
pub use wire::{decode, encode, read_message, read_request, write_message, write_response};
pub use wire::{ProtocolError, MAX_MESSAGE_LEN};
