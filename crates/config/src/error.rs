// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

use thiserror::Error;

/// Config Validator failures (spec §4.10, §7 `ConfigError`). Every
/// variant is reject-at-validation, never-panic (spec §7 `NotFoundError`
/// policy for reference errors).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("source {0:?} has an empty driver")]
    EmptySourceDriver(String),
    #[error("source {0:?} has an empty uri")]
    EmptySourceUri(String),
    #[error("sender {0:?} has an empty driver")]
    EmptySenderDriver(String),
    #[error("sender {0:?} has an empty uri")]
    EmptySenderUri(String),
    #[error("pipe {0:?} references unknown source {1:?}")]
    UnknownSource(String, String),
    #[error("pipe {0:?} references unknown sender {1:?}")]
    UnknownSender(String, String),
    #[error("pipe {0:?} references unknown view {1:?}")]
    UnknownView(String, String),
    #[error("pipes {0:?} and {1:?} both use (source={2:?}, sender={3:?})")]
    DuplicateSourceSenderPair(String, String, String, String),
    #[error("I/O error writing config: {0}")]
    Io(String),
    #[error("YAML error: {0}")]
    Yaml(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::Yaml(e.to_string())
    }
}
