// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fustor-view: the Fusion-side in-memory directory tree — C2 (View
//! State & Tree), C3 (View Arbitrator), and C4 (Audit Manager) from the
//! Event Arbitration Core. [`View`] is the single entry point a Fusion
//! Pipe's per-view worker drives.

pub mod arbitrator;
pub mod audit;
pub mod node;
pub mod path;
pub mod state;
pub mod tree;
pub mod view;

pub use arbitrator::Arbitrator;
pub use audit::AuditManager;
pub use node::{DirectoryNode, FileNode, NodeKind, NodePayload, NodeRef};
pub use state::ViewState;
pub use tree::Tree;
pub use view::View;
