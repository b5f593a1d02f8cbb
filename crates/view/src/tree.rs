// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! The directory/file tree and its structural invariants (spec §4.2,
//! C2). Deliberately ignorant of tombstones, suspects, and blind-spots —
//! those auxiliary sets live on [`crate::state::ViewState`], which
//! drives the recursive delete cascade spec'd for C2.

use crate::node::{DirectoryNode, FileNode, NodeKind, NodePayload, NodeRef};
use crate::path::{self, ROOT};
use std::collections::HashMap;

pub struct Tree {
    file_path_map: HashMap<String, FileNode>,
    directory_path_map: HashMap<String, DirectoryNode>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        let mut directory_path_map = HashMap::new();
        directory_path_map.insert(
            ROOT.to_string(),
            DirectoryNode {
                path: ROOT.to_string(),
                modified_time: 0.0,
                size: 0,
                last_updated_at: 0.0,
                integrity_suspect: false,
                children: HashMap::new(),
            },
        );
        Self { file_path_map: HashMap::new(), directory_path_map }
    }

    pub fn get_node(&self, path: &str) -> Option<NodeRef<'_>> {
        if let Some(file) = self.file_path_map.get(path) {
            return Some(NodeRef::File(file));
        }
        self.directory_path_map.get(path).map(NodeRef::Directory)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.file_path_map.contains_key(path) || self.directory_path_map.contains_key(path)
    }

    /// Direct children of `path` as full paths (empty if `path` is a
    /// file or doesn't exist).
    pub fn child_paths(&self, path: &str) -> Vec<String> {
        self.directory_path_map
            .get(path)
            .map(|dir| dir.children.keys().map(|name| path::join(path, name)).collect())
            .unwrap_or_default()
    }

    /// Ensures every ancestor of `path` exists as a `DirectoryNode`,
    /// creating intermediate directories stamped with `last_updated_at`
    /// and linking each into its own parent's `children`.
    pub fn ensure_parent_chain(&mut self, path: &str, last_updated_at: f64) {
        if let Some(parent) = path::parent_of(path) {
            self.ensure_directory(&parent, last_updated_at);
        }
    }

    fn ensure_directory(&mut self, path: &str, last_updated_at: f64) {
        if path == ROOT || self.directory_path_map.contains_key(path) {
            return;
        }
        if let Some(parent) = path::parent_of(path) {
            self.ensure_directory(&parent, last_updated_at);
        }
        self.directory_path_map.insert(
            path.to_string(),
            DirectoryNode {
                path: path.to_string(),
                modified_time: last_updated_at,
                size: 0,
                last_updated_at,
                integrity_suspect: false,
                children: HashMap::new(),
            },
        );
        self.link_child(path);
    }

    fn link_child(&mut self, path: &str) {
        let Some(parent_path) = path::parent_of(path) else { return };
        let name = path::base_name(path).to_string();
        let kind = if self.file_path_map.contains_key(path) {
            NodeKind::File
        } else {
            NodeKind::Directory
        };
        if let Some(parent) = self.directory_path_map.get_mut(&parent_path) {
            parent.children.insert(name, kind);
        }
    }

    fn unlink_child(&mut self, path: &str) {
        let Some(parent_path) = path::parent_of(path) else { return };
        let name = path::base_name(path);
        if let Some(parent) = self.directory_path_map.get_mut(&parent_path) {
            parent.children.remove(name);
        }
    }

    /// Create, type-switch, or update the node at `path`. Ensures the
    /// parent chain first; if an existing node is the wrong kind
    /// (dir↔file), the caller must remove it (via
    /// [`crate::state::ViewState::delete_node`]) before calling this —
    /// `update_node` itself only handles the already-matching-kind case
    /// so the cascading delete stays in one place.
    pub fn update_node(&mut self, path: &str, payload: NodePayload, last_updated_at: f64) {
        self.ensure_parent_chain(path, last_updated_at);

        match payload.kind() {
            NodeKind::File => {
                let node = self.file_path_map.entry(path.to_string()).or_insert_with(|| FileNode {
                    path: path.to_string(),
                    modified_time: payload.modified_time,
                    size: payload.size,
                    last_updated_at,
                    integrity_suspect: false,
                });
                node.modified_time = payload.modified_time;
                node.size = payload.size;
                node.last_updated_at = last_updated_at;
            }
            NodeKind::Directory => {
                let node = self
                    .directory_path_map
                    .entry(path.to_string())
                    .or_insert_with(|| DirectoryNode {
                        path: path.to_string(),
                        modified_time: payload.modified_time,
                        size: payload.size,
                        last_updated_at,
                        integrity_suspect: false,
                        children: HashMap::new(),
                    });
                node.modified_time = payload.modified_time;
                node.size = payload.size;
                node.last_updated_at = last_updated_at;
            }
        }
        self.link_child(path);
    }

    pub fn set_integrity_suspect(&mut self, path: &str, suspect: bool) {
        if let Some(file) = self.file_path_map.get_mut(path) {
            file.integrity_suspect = suspect;
        } else if let Some(dir) = self.directory_path_map.get_mut(path) {
            dir.integrity_suspect = suspect;
        }
    }

    /// Removes exactly the node at `path` (not descendants). The root
    /// is never removed. Returns the kind removed, if any.
    pub fn remove_single(&mut self, path: &str) -> Option<NodeKind> {
        if path == ROOT {
            return None;
        }
        if self.directory_path_map.remove(path).is_some() {
            self.unlink_child(path);
            Some(NodeKind::Directory)
        } else if self.file_path_map.remove(path).is_some() {
            self.unlink_child(path);
            Some(NodeKind::File)
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tests;
