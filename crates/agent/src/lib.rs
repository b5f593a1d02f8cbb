// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fustor-agent: the Agent Pipe Runtime (spec §4.6, C6) and its
//! supporting pieces — per-counter backoff (§4.6), the state bitmap
//! (§4.6), the generic component supervisor (§4.9, C9), and the Event
//! Bus a set of co-located pipes shares when they read the same
//! `source_config` (§4.8, C8). [`AgentHost`] ties a validated
//! [`fustor_config::AgentConfig`] to caller-supplied driver instances
//! and owns the host-level commands that act on the whole process
//! rather than one pipe.

mod backoff;
mod bus;
mod error;
mod pipe;
mod state;
mod supervisor;

pub use backoff::Backoff;
pub use bus::{BusSubscription, EventBus, DEFAULT_BUS_CAPACITY};
pub use error::AgentError;
pub use pipe::{AgentPipe, DEFAULT_CONTROL_LOOP_INTERVAL, DEFAULT_HEARTBEAT_INTERVAL};
pub use state::{PipeState, PipeStateCell};
pub use supervisor::{RestartPolicy, StartOutcome, Supervisor};

use fustor_adapters::{SenderDriver, SourceDriver};
use fustor_config::{validate_agent_config, AgentConfig, ConfigError};
use fustor_core::{AgentId, PipeId};
use fustor_wire::Command;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level Agent process: every configured, enabled pipe plus the
/// host-level commands that act on the whole config rather than one
/// pipe (`reload_config`, `update_config`, `report_config`, `upgrade`;
/// spec §4.6 "Commands").
pub struct AgentHost {
    #[allow(dead_code)]
    agent_id: AgentId,
    config_dir: PathBuf,
    pipes: HashMap<String, Arc<AgentPipe<dyn SourceDriver, dyn SenderDriver>>>,
}

impl AgentHost {
    /// Validates `config` (spec §4.10) then builds one [`AgentPipe`]
    /// per enabled entry in `config.pipes`, wired to the
    /// caller-supplied driver instances. Concrete probing/sending
    /// (inotify, S3 listing, the HTTP binding to Fusion, ...) is an
    /// external collaborator per spec §1 Non-goals; this crate only
    /// knows the `SourceDriver`/`SenderDriver` trait surface, so the
    /// binary assembling an `AgentHost` is responsible for resolving
    /// each `driver` name to a concrete instance beforehand.
    pub fn from_config(
        config: &AgentConfig,
        config_dir: PathBuf,
        sources: &HashMap<String, Arc<dyn SourceDriver>>,
        senders: &HashMap<String, Arc<dyn SenderDriver>>,
    ) -> Result<Self, AgentError> {
        validate_agent_config(config)?;
        let agent_id = config.agent_id.as_deref().map(AgentId::from_string).unwrap_or_else(AgentId::new);

        let mut pipes = HashMap::new();
        for (pipe_key, pipe_cfg) in &config.pipes {
            if pipe_cfg.disabled {
                continue;
            }
            let source = sources.get(&pipe_cfg.source).cloned().ok_or_else(|| {
                AgentError::Degraded(format!("no source driver wired for {:?}", pipe_cfg.source))
            })?;
            let sender = senders.get(&pipe_cfg.sender).cloned().ok_or_else(|| {
                AgentError::Degraded(format!("no sender driver wired for {:?}", pipe_cfg.sender))
            })?;
            // `validate_agent_config` already confirmed this reference
            // resolves; a miss here would be an internal inconsistency,
            // not a config mistake, so it is not worth its own error
            // variant.
            let batch_size = config.senders.get(&pipe_cfg.sender).map(|s| s.batch_size).unwrap_or(100);

            let pipe_id = PipeId::from_string(pipe_key);
            let agent_pipe: Arc<AgentPipe<dyn SourceDriver, dyn SenderDriver>> =
                AgentPipe::new(pipe_id, &agent_id, source, sender, pipe_cfg.clone(), batch_size);
            pipes.insert(pipe_key.clone(), agent_pipe);
        }

        Ok(Self { agent_id, config_dir, pipes })
    }

    /// Starts every pipe's four supervised tasks (spec §4.6, §4.9).
    pub fn start_all(&self) -> Vec<StartOutcome> {
        self.pipes.values().flat_map(|pipe| pipe.start()).collect()
    }

    pub async fn stop_all(&self) {
        for pipe in self.pipes.values() {
            pipe.stop().await;
        }
    }

    pub fn pipe(&self, pipe_key: &str) -> Option<&Arc<AgentPipe<dyn SourceDriver, dyn SenderDriver>>> {
        self.pipes.get(pipe_key)
    }

    pub fn pipe_keys(&self) -> impl Iterator<Item = &str> {
        self.pipes.keys().map(String::as_str)
    }

    /// Routes a command delivered to this Agent (e.g. relayed from a
    /// `/management/agents/{id}/command` request) to the pipe it names,
    /// or applies it host-wide for the four commands that are not
    /// pipe-scoped (spec §4.6 "Commands"). `scan` carries no pipe
    /// reference in its own wire shape; a caller that already knows
    /// which pipe to target should call
    /// `pipe(key).enqueue_command(...)` directly instead of going
    /// through this host-wide dispatcher.
    pub fn dispatch(&self, command: Command) {
        match command {
            Command::StopPipe { ref pipe_id } => {
                if let Some(pipe) = self.pipes.get(pipe_id) {
                    pipe.enqueue_command(command.clone());
                } else {
                    tracing::warn!(pipe_id, "stop_pipe for unknown pipe, ignored");
                }
            }
            Command::Scan { .. } => {
                tracing::warn!("scan command requires a target pipe, ignored at host scope");
            }
            Command::ReloadConfig => self.reload_config(),
            Command::UpdateConfig { config_yaml, filename } => {
                if let Err(err) = self.update_config(&filename, &config_yaml) {
                    tracing::error!(error = %err, filename, "update_config failed");
                }
            }
            Command::ReportConfig { filename } => match self.report_config(&filename) {
                Ok(contents) => tracing::info!(filename, bytes = contents.len(), "config reported"),
                Err(err) => tracing::error!(error = %err, filename, "report_config failed"),
            },
            Command::Upgrade { version } => {
                tracing::info!(version, "upgrade requested; binary replacement is an external collaborator");
            }
        }
    }

    fn reload_config(&self) {
        tracing::info!(
            config_dir = %self.config_dir.display(),
            "reload_config requested; rebuilding pipes from driver instances already wired at startup is out of scope here, the host process restart cycle picks up the change"
        );
    }

    /// `update_config` (spec §4.6 "Commands", §6 "Update commands
    /// write atomically").
    fn update_config(&self, filename: &str, config_yaml: &str) -> Result<(), AgentError> {
        let target = self.config_dir.join(filename);
        fustor_config::write_atomic(&target, config_yaml)?;
        Ok(())
    }

    fn report_config(&self, filename: &str) -> Result<String, AgentError> {
        let target = self.config_dir.join(filename);
        std::fs::read_to_string(&target).map_err(|e| AgentError::Config(ConfigError::Io(e.to_string())))
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
