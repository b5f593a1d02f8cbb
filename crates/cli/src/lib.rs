// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fustor-cli: process wiring shared by the `fustord` and
//! `fustor-agentd` binaries — config-dir resolution, YAML loading,
//! `tracing` initialization, and the exit-code-carrying error type
//! `main()` turns into a process exit (spec §6 "Exit codes").

mod exit_error;

pub use exit_error::ExitError;

use fustor_config::LoggingConfig;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Resolve the directory config files are loaded from and
/// `update_config` writes into: `FUSTOR_HOME` > `XDG_CONFIG_HOME/fustor`
/// > `~/.config/fustor`.
pub fn fustor_home() -> Result<PathBuf, ExitError> {
    if let Ok(dir) = std::env::var("FUSTOR_HOME") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join("fustor"));
    }
    let home = std::env::var("HOME")
        .map_err(|_| ExitError::new(2, "cannot resolve config directory: $HOME is unset"))?;
    Ok(PathBuf::from(home).join(".config/fustor"))
}

/// Loads and parses a single YAML config file. Callers run the
/// config-specific `fustor_config::validate_*_config` afterward (or
/// rely on `AgentHost`/`FusionHost::from_config`, which validate
/// internally) — this only handles the file I/O and YAML decoding.
pub fn load_yaml_config<T: DeserializeOwned>(path: &std::path::Path) -> Result<T, ExitError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| ExitError::new(2, format!("cannot read {}: {e}", path.display())))?;
    serde_yaml::from_str(&contents)
        .map_err(|e| ExitError::new(2, format!("cannot parse {}: {e}", path.display())))
}

/// Initializes the global `tracing` subscriber from a config's
/// `logging?` block (SPEC_FULL §10.2). Human-readable text by default;
/// `logging.json = true` switches to structured JSON lines.
pub fn init_logging(config: &LoggingConfig) {
    let filter = config
        .filter
        .as_deref()
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::new("info"));

    if config.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
