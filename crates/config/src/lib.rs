// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fustor-config: YAML configuration models (spec §6 "Config file
//! shapes") and the Config Validator (§4.10). Also provides the
//! atomic-write-with-`.bak`-backup sequence used by the Agent Pipe's
//! `update_config` command (§4.6) and its Fusion-side management
//! equivalent.

pub mod atomic;
pub mod error;
pub mod model;
pub mod validate;

pub use atomic::write_atomic;
pub use error::ConfigError;
pub use model::{
    AgentConfig, FusionConfig, LoggingConfig, PipeConfig, ReceiverConfig, SenderConfig,
    SourceConfig, ViewConfig,
};
pub use validate::{validate_agent_config, validate_fusion_config, validate_triple};
