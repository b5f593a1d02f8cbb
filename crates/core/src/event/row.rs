// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Typed view of a single row inside an [`super::Event`]'s `rows` list,
//! for the `"fs"` event schema (spec §3 "FS row").

use serde_json::Value;
use std::collections::HashMap;

/// One filesystem entity observed by a source driver.
///
/// `path` uniquely identifies the entity within the view (spec §3
/// invariant). `is_atomic_write` distinguishes a finished write
/// (CLOSE_WRITE, rename-into-place) from an in-progress one (a bare
/// MODIFY), letting the Arbitrator decide whether a row is safe to
/// treat as a committed version (spec §4.3).
#[derive(Debug, Clone, PartialEq)]
pub struct FsRow {
    pub path: String,
    pub modified_time: f64,
    pub size: u64,
    pub is_directory: bool,
    pub file_name: Option<String>,
    pub created_time: Option<f64>,
    pub parent_path: Option<String>,
    pub parent_mtime: Option<f64>,
    pub is_atomic_write: Option<bool>,
}

impl FsRow {
    /// Parse a raw JSON row map, returning `None` if a required field
    /// (`path`, `modified_time`, `size`, `is_directory`) is missing or
    /// of the wrong type.
    pub fn from_raw(raw: &HashMap<String, Value>) -> Option<Self> {
        Some(Self {
            path: raw.get("path")?.as_str()?.to_string(),
            modified_time: raw.get("modified_time")?.as_f64()?,
            size: raw.get("size")?.as_u64()?,
            is_directory: raw.get("is_directory")?.as_bool()?,
            file_name: raw.get("file_name").and_then(Value::as_str).map(String::from),
            created_time: raw.get("created_time").and_then(Value::as_f64),
            parent_path: raw.get("parent_path").and_then(Value::as_str).map(String::from),
            parent_mtime: raw.get("parent_mtime").and_then(Value::as_f64),
            is_atomic_write: raw.get("is_atomic_write").and_then(Value::as_bool),
        })
    }
}

#[cfg(test)]
#[path = "row_tests.rs"]
mod tests;
