// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fustor-adapters: the closed capability set an Agent Pipe dispatches
//! through (spec §9 "Dynamic dispatch") — `SourceDriver` for whatever is
//! being watched, `SenderDriver` for the Fusion endpoint it reports to.
//! Real probing (inotify, S3 listing, an HTTP client) is an external
//! collaborator per §1 Non-goals; this crate defines the traits plus
//! in-memory fakes used by `fustor-agent`'s tests and the demo binaries.

pub mod error;
pub mod sender;
pub mod source;

pub use error::AdapterError;
pub use sender::{FakeSenderDriver, HeartbeatReply, SenderDriver, SessionInfo};
pub use source::{FakeSourceDriver, SourceDriver};
