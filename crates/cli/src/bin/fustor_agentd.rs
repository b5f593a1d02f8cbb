// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! `fustor-agentd`: the Agent host process (spec §4.6, C6). Loads and
//! validates an [`AgentConfig`], wires a driver instance per
//! configured source/sender, builds the [`AgentHost`], starts every
//! enabled pipe's four supervised tasks, and reacts to signals for the
//! rest of its life.
//!
//! Concrete probing and sending (inotify, S3 listing, the HTTP binding
//! to a Fusion receiver, ...) are external collaborators per spec §1
//! Non-goals; this binary wires `fustor-adapters`' in-memory fakes as
//! its driver instances, the same ones the library crates' own test
//! suites drive.

use clap::Parser;
use fustor_adapters::{FakeSenderDriver, FakeSourceDriver, SenderDriver, SourceDriver};
use fustor_agent::AgentHost;
use fustor_cli::ExitError;
use fustor_config::AgentConfig;
use fustor_wire::Command;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};

#[derive(Parser, Debug)]
#[command(name = "fustor-agentd", about = "Fustor Agent host")]
struct Args {
    /// Path to the Agent YAML config file. Defaults to
    /// `$FUSTOR_HOME/agent.yaml`.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fustor-agentd: {e}");
            ExitCode::from(e.code as u8)
        }
    }
}

async fn run() -> Result<(), ExitError> {
    let args = Args::parse();
    let config_path = match args.config {
        Some(p) => p,
        None => fustor_cli::fustor_home()?.join("agent.yaml"),
    };
    let config_dir = config_path.parent().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    let config: AgentConfig = fustor_cli::load_yaml_config(&config_path)?;
    fustor_cli::init_logging(&config.logging);

    let sources: HashMap<String, Arc<dyn SourceDriver>> = config
        .sources
        .keys()
        .map(|id| (id.clone(), Arc::new(FakeSourceDriver::new()) as Arc<dyn SourceDriver>))
        .collect();
    let senders: HashMap<String, Arc<dyn SenderDriver>> = config
        .senders
        .keys()
        .map(|id| (id.clone(), Arc::new(FakeSenderDriver::new()) as Arc<dyn SenderDriver>))
        .collect();

    let host = Arc::new(
        AgentHost::from_config(&config, config_dir, &sources, &senders)
            .map_err(|e| ExitError::new(2, format!("invalid agent config: {e}")))?,
    );

    let outcomes = host.start_all();
    for outcome in &outcomes {
        if outcome.success {
            tracing::info!(pipe = %outcome.component_id, "pipe started");
        } else {
            tracing::error!(pipe = %outcome.component_id, error = ?outcome.error, "pipe failed to start");
        }
    }
    tracing::info!(config = %config_path.display(), pipes = outcomes.len(), "fustor-agentd started");

    let mut sighup = signal(SignalKind::hangup())
        .map_err(|e| ExitError::new(2, format!("cannot install SIGHUP handler: {e}")))?;
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| ExitError::new(2, format!("cannot install SIGTERM handler: {e}")))?;

    loop {
        tokio::select! {
            _ = sighup.recv() => {
                tracing::info!("SIGHUP received, dispatching reload_config");
                host.dispatch(Command::ReloadConfig);
            }
            _ = sigterm.recv() => {
                tracing::info!("SIGTERM received, shutting down");
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("SIGINT received, shutting down");
                break;
            }
        }
    }

    host.stop_all().await;
    Ok(())
}
