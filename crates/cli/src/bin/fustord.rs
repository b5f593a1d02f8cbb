// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! `fustord`: the Fusion host process (spec §4.7, C7). Loads and
//! validates a [`FusionConfig`], builds the [`FusionHost`], and sits
//! on it for the lifetime of the process — the receiver that decodes
//! wire requests and hands them to `FusionHost::handle` is the
//! transport binding, an external collaborator per spec §1 Non-goals,
//! so this binary's job ends at "the host exists and reacts to
//! signals."

use clap::Parser;
use fustor_cli::ExitError;
use fustor_config::FusionConfig;
use fustor_fusion::FusionHost;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::signal::unix::{signal, SignalKind};

#[derive(Parser, Debug)]
#[command(name = "fustord", about = "Fustor Fusion host")]
struct Args {
    /// Path to the Fusion YAML config file. Defaults to
    /// `$FUSTOR_HOME/fusion.yaml`.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fustord: {e}");
            ExitCode::from(e.code as u8)
        }
    }
}

async fn run() -> Result<(), ExitError> {
    let args = Args::parse();
    let config_path = match args.config {
        Some(p) => p,
        None => fustor_cli::fustor_home()?.join("fusion.yaml"),
    };

    let config: FusionConfig = fustor_cli::load_yaml_config(&config_path)?;
    fustor_cli::init_logging(&config.logging);

    let host = FusionHost::from_config(&config)
        .map_err(|e| ExitError::new(2, format!("invalid fusion config: {e}")))?;

    tracing::info!(config = %config_path.display(), "fustord started");

    let mut sighup = signal(SignalKind::hangup())
        .map_err(|e| ExitError::new(2, format!("cannot install SIGHUP handler: {e}")))?;
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| ExitError::new(2, format!("cannot install SIGTERM handler: {e}")))?;

    loop {
        tokio::select! {
            _ = sighup.recv() => {
                // Re-reading and re-validating the config is cheap; swapping it
                // into a running `FusionHost` without dropping in-flight sessions
                // is not — out of scope here, same as the Agent side's
                // `reload_config` (spec §4.6). A process manager that restarts
                // on SIGHUP gets the same effect.
                match fustor_cli::load_yaml_config::<FusionConfig>(&config_path) {
                    Ok(reloaded) => match fustor_config::validate_fusion_config(&reloaded) {
                        Ok(()) => tracing::info!("SIGHUP: config re-validated OK, restart to apply"),
                        Err(e) => tracing::error!(error = %e, "SIGHUP: reloaded config is invalid, keeping current"),
                    },
                    Err(e) => tracing::error!(error = %e, "SIGHUP: failed to reload config"),
                }
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

    drop(host);
    Ok(())
}
