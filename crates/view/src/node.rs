// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! In-memory node types (spec §3 "Node (in-memory)").

use std::collections::HashMap;

/// Whether a path in the tree names a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    File,
    Directory,
}

/// A leaf entity: a regular file (or any non-container object under the
/// `"fs"` schema).
#[derive(Debug, Clone, PartialEq)]
pub struct FileNode {
    pub path: String,
    pub modified_time: f64,
    pub size: u64,
    /// Wall clock of the most recent apply (not the source's
    /// `modified_time` — used by Rule 3 stale-evidence protection).
    pub last_updated_at: f64,
    pub integrity_suspect: bool,
}

/// A container entity. `children` maps a direct child's base name to its
/// kind; invariant (b) in spec §3 requires a name to appear here iff the
/// corresponding global map holds that child.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryNode {
    pub path: String,
    pub modified_time: f64,
    pub size: u64,
    pub last_updated_at: f64,
    pub integrity_suspect: bool,
    pub children: HashMap<String, NodeKind>,
}

/// Borrowed view of whichever map holds a path, returned by
/// [`crate::tree::Tree::get_node`].
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    File(&'a FileNode),
    Directory(&'a DirectoryNode),
}

impl NodeRef<'_> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::File(_) => NodeKind::File,
            NodeRef::Directory(_) => NodeKind::Directory,
        }
    }

    pub fn modified_time(&self) -> f64 {
        match self {
            NodeRef::File(n) => n.modified_time,
            NodeRef::Directory(n) => n.modified_time,
        }
    }

    pub fn last_updated_at(&self) -> f64 {
        match self {
            NodeRef::File(n) => n.last_updated_at,
            NodeRef::Directory(n) => n.last_updated_at,
        }
    }

    pub fn integrity_suspect(&self) -> bool {
        match self {
            NodeRef::File(n) => n.integrity_suspect,
            NodeRef::Directory(n) => n.integrity_suspect,
        }
    }
}

/// Fields carried by an incoming row, decoupled from the wire
/// [`fustor_core::FsRow`] shape so the tree doesn't need to know about
/// event framing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePayload {
    pub modified_time: f64,
    pub size: u64,
    pub is_directory: bool,
}

impl NodePayload {
    pub fn kind(&self) -> NodeKind {
        if self.is_directory {
            NodeKind::Directory
        } else {
            NodeKind::File
        }
    }
}
