// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! In-memory [`super::SourceDriver`] backed by pre-seeded rows. Used by
//! integration tests and the demo binaries in place of a real
//! filesystem/object-store probe.

use super::SourceDriver;
use crate::error::AdapterError;
use async_trait::async_trait;
use fustor_core::{Event, EventType, MessageSource};
use fustor_wire::SentinelTask;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;

pub struct FakeSourceDriver {
    snapshot_rows: Mutex<Vec<HashMap<String, serde_json::Value>>>,
    message_rows: Mutex<Vec<(i64, HashMap<String, serde_json::Value>)>>,
    audit_rows: Mutex<Vec<HashMap<String, serde_json::Value>>>,
    sentinel_mtimes: Mutex<HashMap<String, f64>>,
}

impl FakeSourceDriver {
    pub fn new() -> Self {
        Self {
            snapshot_rows: Mutex::new(Vec::new()),
            message_rows: Mutex::new(Vec::new()),
            audit_rows: Mutex::new(Vec::new()),
            sentinel_mtimes: Mutex::new(HashMap::new()),
        }
    }

    pub fn seed_snapshot_row(&self, path: &str, modified_time: f64, size: u64, is_directory: bool) {
        self.snapshot_rows.lock().push(row(path, modified_time, size, is_directory));
    }

    pub fn seed_message_row(
        &self,
        index: i64,
        path: &str,
        modified_time: f64,
        size: u64,
        is_directory: bool,
    ) {
        self.message_rows.lock().push((index, row(path, modified_time, size, is_directory)));
    }

    pub fn seed_audit_row(&self, path: &str, modified_time: f64, size: u64, is_directory: bool) {
        self.audit_rows.lock().push(row(path, modified_time, size, is_directory));
    }

    pub fn set_current_mtime(&self, path: &str, mtime: f64) {
        self.sentinel_mtimes.lock().insert(path.to_string(), mtime);
    }
}

impl Default for FakeSourceDriver {
    fn default() -> Self {
        Self::new()
    }
}

fn row(path: &str, modified_time: f64, size: u64, is_directory: bool) -> HashMap<String, serde_json::Value> {
    let mut m = HashMap::new();
    m.insert("path".to_string(), json!(path));
    m.insert("modified_time".to_string(), json!(modified_time));
    m.insert("size".to_string(), json!(size));
    m.insert("is_directory".to_string(), json!(is_directory));
    m
}

fn drain_batch(
    rows: &mut Vec<HashMap<String, serde_json::Value>>,
    batch_size: usize,
    source: MessageSource,
    index: i64,
) -> Option<Event> {
    if rows.is_empty() {
        return None;
    }
    let take = rows.len().min(batch_size.max(1));
    let batch: Vec<_> = rows.drain(..take).collect();
    Some(Event::new(
        EventType::Insert,
        "fs".to_string(),
        "files".to_string(),
        vec![
            "path".to_string(),
            "modified_time".to_string(),
            "size".to_string(),
            "is_directory".to_string(),
        ],
        batch,
        source,
        index,
    ))
}

#[async_trait]
impl SourceDriver for FakeSourceDriver {
    async fn next_snapshot_batch(&self, batch_size: usize) -> Result<Option<Event>, AdapterError> {
        let mut rows = self.snapshot_rows.lock();
        Ok(drain_batch(&mut rows, batch_size, MessageSource::Snapshot, 0))
    }

    async fn next_message_batch(
        &self,
        start_position: i64,
        batch_size: usize,
    ) -> Result<Option<Event>, AdapterError> {
        let mut rows = self.message_rows.lock();
        rows.retain(|(index, _)| *index >= start_position);
        if rows.is_empty() {
            return Ok(None);
        }
        let take = rows.len().min(batch_size.max(1));
        let drained: Vec<_> = rows.drain(..take).collect();
        let last_index = drained.last().map(|(index, _)| *index).unwrap_or(start_position);
        let batch = drained.into_iter().map(|(_, row)| row).collect();
        Ok(Some(Event::new(
            EventType::Insert,
            "fs".to_string(),
            "files".to_string(),
            vec![
                "path".to_string(),
                "modified_time".to_string(),
                "size".to_string(),
                "is_directory".to_string(),
            ],
            batch,
            MessageSource::Realtime,
            last_index,
        )))
    }

    async fn next_audit_batch(&self, batch_size: usize) -> Result<Option<Event>, AdapterError> {
        let mut rows = self.audit_rows.lock();
        Ok(drain_batch(&mut rows, batch_size, MessageSource::Audit, 0))
    }

    async fn next_scan_batch(
        &self,
        path: &str,
        _recursive: bool,
        batch_size: usize,
    ) -> Result<Option<Event>, AdapterError> {
        let mut rows = self.snapshot_rows.lock();
        let mut matched: Vec<HashMap<String, serde_json::Value>> = Vec::new();
        rows.retain(|row| {
            let under_path = row.get("path").and_then(|v| v.as_str()).is_some_and(|p| p.starts_with(path));
            if under_path && matched.len() < batch_size.max(1) {
                matched.push(row.clone());
                false
            } else {
                true
            }
        });
        Ok(drain_batch(&mut matched, batch_size, MessageSource::Snapshot, 0))
    }

    async fn perform_sentinel_check(
        &self,
        tasks: &[SentinelTask],
    ) -> Result<Vec<(String, f64)>, AdapterError> {
        let mtimes = self.sentinel_mtimes.lock();
        Ok(tasks
            .iter()
            .map(|task| {
                let current = mtimes.get(&task.path).copied().unwrap_or(task.expected_mtime);
                (task.path.clone(), current)
            })
            .collect())
    }
}
