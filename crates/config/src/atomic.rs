// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Atomic config-file writes with a `.bak` backup (spec §6 "Update
//! commands write atomically: copy existing -> `.bak`, then overwrite
//! target; on failure, restore from `.bak`"). Used by the Agent Pipe's
//! `update_config` command (§4.6) and its Fusion-side management
//! equivalent.

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

fn backup_path(target: &Path) -> PathBuf {
    let mut backup = target.as_os_str().to_owned();
    backup.push(".bak");
    PathBuf::from(backup)
}

/// Writes `contents` to `target`, backing up any existing file to
/// `target.bak` first. If the write fails, the original file (if any)
/// is restored from the backup before the error propagates, so a failed
/// `update_config` never leaves a half-written or missing config on
/// disk (spec §4.6 "on success ... on failure, restore backup and
/// log").
///
/// The write itself goes through a same-directory temp file plus
/// `rename` so a crash mid-write cannot leave `target` truncated.
pub fn write_atomic(target: &Path, contents: &str) -> Result<(), ConfigError> {
    let backup = backup_path(target);
    let had_existing = target.exists();
    if had_existing {
        std::fs::copy(target, &backup)?;
    }

    match write_via_temp(target, contents) {
        Ok(()) => Ok(()),
        Err(e) => {
            if had_existing {
                // Best-effort restore; the write error is the one that matters.
                let _ = std::fs::copy(&backup, target);
            } else {
                let _ = std::fs::remove_file(target);
            }
            Err(e)
        }
    }
}

fn write_via_temp(target: &Path, contents: &str) -> Result<(), ConfigError> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let temp = dir.join(format!(
        ".{}.tmp",
        target.file_name().and_then(|n| n.to_str()).unwrap_or("fustor-config")
    ));
    // Collision with a stale temp from a previous crashed write is fine:
    // we overwrite it unconditionally.
    std::fs::write(&temp, contents)?;
    std::fs::rename(&temp, target).inspect_err(|_| {
        let _ = std::fs::remove_file(&temp);
    })?;
    Ok(())
}

/// Restores `target` from its `.bak` backup, if one exists. Returns
/// `false` if there was no backup to restore from.
pub fn restore_backup(target: &Path) -> Result<bool, ConfigError> {
    let backup = backup_path(target);
    if !backup.exists() {
        return Ok(false);
    }
    std::fs::copy(&backup, target)?;
    Ok(true)
}

#[cfg(test)]
#[path = "atomic_tests.rs"]
mod tests;
