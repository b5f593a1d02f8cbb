// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Config Validator (spec §4.10): validates a sources/senders/pipes
//! triple. Shared between `fustor-config::AgentConfig` and
//! `::FusionConfig` since both carry the same three maps plus
//! Fusion-only `views`/`receivers`.

use crate::error::ConfigError;
use crate::model::{AgentConfig, FusionConfig, PipeConfig, SenderConfig, SourceConfig};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Validates `sources`/`senders`/`pipes`:
/// - every source/sender has non-empty `driver` and `uri`
/// - every pipe's `source`/`sender` reference an existing config
/// - no two pipes share the same `(source, sender)` pair
///
/// Disabled sources/senders/pipes are still validated for shape (a
/// disabled entry with an empty `uri` is still a config mistake worth
/// catching at load time) but disabled *pipes* are excluded from the
/// duplicate-pair check — two disabled pipes, or one disabled and one
/// enabled, sharing a pair is not a live conflict.
pub fn validate_triple(
    sources: &IndexMap<String, SourceConfig>,
    senders: &IndexMap<String, SenderConfig>,
    pipes: &IndexMap<String, PipeConfig>,
) -> Result<(), ConfigError> {
    for (id, source) in sources {
        if source.driver.is_empty() {
            return Err(ConfigError::EmptySourceDriver(id.clone()));
        }
        if source.uri.is_empty() {
            return Err(ConfigError::EmptySourceUri(id.clone()));
        }
    }
    for (id, sender) in senders {
        if sender.driver.is_empty() {
            return Err(ConfigError::EmptySenderDriver(id.clone()));
        }
        if sender.uri.is_empty() {
            return Err(ConfigError::EmptySenderUri(id.clone()));
        }
    }

    let mut seen_pairs: HashSet<(&str, &str)> = HashSet::new();
    let mut seen_by: IndexMap<(&str, &str), &str> = IndexMap::new();
    for (pipe_id, pipe) in pipes {
        if !sources.contains_key(&pipe.source) {
            return Err(ConfigError::UnknownSource(pipe_id.clone(), pipe.source.clone()));
        }
        if !senders.contains_key(&pipe.sender) {
            return Err(ConfigError::UnknownSender(pipe_id.clone(), pipe.sender.clone()));
        }
        if pipe.disabled {
            continue;
        }
        let pair = (pipe.source.as_str(), pipe.sender.as_str());
        if !seen_pairs.insert(pair) {
            let other = seen_by.get(&pair).copied().unwrap_or("");
            return Err(ConfigError::DuplicateSourceSenderPair(
                other.to_string(),
                pipe_id.clone(),
                pipe.source.clone(),
                pipe.sender.clone(),
            ));
        }
        seen_by.insert(pair, pipe_id);
    }

    Ok(())
}

pub fn validate_agent_config(config: &AgentConfig) -> Result<(), ConfigError> {
    validate_triple(&config.sources, &config.senders, &config.pipes)
}

/// As [`validate_agent_config`], plus: every pipe's `view` (when
/// present) references an existing entry in `views`.
pub fn validate_fusion_config(config: &FusionConfig) -> Result<(), ConfigError> {
    validate_triple(&config.sources, &config.senders, &config.pipes)?;
    for (pipe_id, pipe) in &config.pipes {
        if let Some(view) = &pipe.view {
            if !config.views.contains_key(view) {
                return Err(ConfigError::UnknownView(pipe_id.clone(), view.clone()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
