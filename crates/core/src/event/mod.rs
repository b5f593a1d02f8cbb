// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! The wire-level `Event` record (spec §3 "Event (wire record)") and the
//! FS row shape (§3 "FS row") carried inside it.

mod row;

pub use row::FsRow;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of change an [`Event`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    Insert,
    Update,
    Delete,
}

/// Which of the three Agent-produced tiers emitted this event (spec
/// GLOSSARY "Snapshot / Message / Audit").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageSource {
    Realtime,
    Snapshot,
    Audit,
}

impl MessageSource {
    /// Only REALTIME events are eligible to sample clock skew (spec
    /// §4.1); SNAPSHOT and AUDIT rows describe cold, possibly historical
    /// state and must never drag the watermark backward.
    pub fn can_sample_skew(self) -> bool {
        matches!(self, MessageSource::Realtime)
    }
}

/// Free-form metadata carried alongside an event: `pipe_id`, `scan_path`,
/// `job_id`, `phase`, as used by on-demand scans and config-report
/// replies (spec §4.6 Commands).
pub type EventMetadata = HashMap<String, serde_json::Value>;

/// An immutable wire record describing one batch of row-level changes
/// from a single producer (spec §3 "Event (wire record)").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_type: EventType,
    /// Source namespace, e.g. `"fs"`.
    pub event_schema: String,
    /// e.g. `"files"`, `"dirs"`.
    pub table: String,
    /// Ordered field names described by each entry of `rows`.
    pub fields: Vec<String>,
    /// One map per affected entity.
    pub rows: Vec<HashMap<String, serde_json::Value>>,
    pub message_source: MessageSource,
    /// Monotonic position in the producer's stream, in milliseconds of
    /// the producer's logical clock.
    pub index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<EventMetadata>,
}

impl Event {
    pub fn new(
        event_type: EventType,
        event_schema: impl Into<String>,
        table: impl Into<String>,
        fields: Vec<String>,
        rows: Vec<HashMap<String, serde_json::Value>>,
        message_source: MessageSource,
        index: i64,
    ) -> Self {
        Self {
            event_type,
            event_schema: event_schema.into(),
            table: table.into(),
            fields,
            rows,
            message_source,
            index,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: EventMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Parse each raw row into a typed [`FsRow`], silently skipping any
    /// row missing a required field rather than failing the whole batch
    /// (spec §7 FatalError policy: a single malformed event must never
    /// kill a view).
    pub fn fs_rows(&self) -> Vec<FsRow> {
        self.rows.iter().filter_map(FsRow::from_raw).collect()
    }

    pub fn pipe_id(&self) -> Option<&str> {
        self.metadata.as_ref()?.get("pipe_id")?.as_str()
    }

    pub fn scan_path(&self) -> Option<&str> {
        self.metadata.as_ref()?.get("scan_path")?.as_str()
    }

    pub fn job_id(&self) -> Option<&str> {
        self.metadata.as_ref()?.get("job_id")?.as_str()
    }

    pub fn phase(&self) -> Option<&str> {
        self.metadata.as_ref()?.get("phase")?.as_str()
    }
}

crate::simple_display! {
    EventType {
        Insert => "INSERT",
        Update => "UPDATE",
        Delete => "DELETE",
    }
}

crate::simple_display! {
    MessageSource {
        Realtime => "REALTIME",
        Snapshot => "SNAPSHOT",
        Audit => "AUDIT",
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
