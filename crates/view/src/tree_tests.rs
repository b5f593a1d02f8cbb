// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

use super::*;

fn file(modified_time: f64, size: u64) -> NodePayload {
    NodePayload { modified_time, size, is_directory: false }
}

fn dir(modified_time: f64) -> NodePayload {
    NodePayload { modified_time, size: 0, is_directory: true }
}

#[test]
fn root_exists_by_default_and_cannot_be_removed() {
    let mut tree = Tree::new();
    assert!(tree.contains("/"));
    assert_eq!(tree.remove_single("/"), None);
    assert!(tree.contains("/"));
}

#[test]
fn update_node_creates_missing_parent_chain() {
    let mut tree = Tree::new();
    tree.update_node("/a/b/c.txt", file(100.0, 10), 200.0);

    assert!(tree.contains("/a"));
    assert!(tree.contains("/a/b"));
    assert!(tree.contains("/a/b/c.txt"));
    assert_eq!(tree.child_paths("/"), vec!["/a".to_string()]);
    assert_eq!(tree.child_paths("/a"), vec!["/a/b".to_string()]);
    assert_eq!(tree.child_paths("/a/b"), vec!["/a/b/c.txt".to_string()]);
}

#[test]
fn update_node_merges_fields_on_existing_node() {
    let mut tree = Tree::new();
    tree.update_node("/a.txt", file(100.0, 10), 200.0);
    tree.update_node("/a.txt", file(150.0, 20), 250.0);

    let node = tree.get_node("/a.txt").expect("node exists");
    assert_eq!(node.modified_time(), 150.0);
    assert_eq!(node.last_updated_at(), 250.0);
}

#[test]
fn remove_single_unlinks_from_parent() {
    let mut tree = Tree::new();
    tree.update_node("/a.txt", file(100.0, 10), 200.0);
    tree.remove_single("/a.txt");

    assert!(!tree.contains("/a.txt"));
    assert!(tree.child_paths("/").is_empty());
}

#[test]
fn remove_single_does_not_recurse_into_children() {
    let mut tree = Tree::new();
    tree.update_node("/a/b.txt", file(100.0, 10), 200.0);
    tree.remove_single("/a");

    // The directory entry itself is gone but its former child is not
    // touched by remove_single — cascading is the caller's job.
    assert!(!tree.contains("/a"));
    assert!(tree.contains("/a/b.txt"));
}

#[test]
fn get_node_returns_none_for_unknown_path() {
    let tree = Tree::new();
    assert!(tree.get_node("/missing").is_none());
}

#[test]
fn directory_payload_creates_directory_node() {
    let mut tree = Tree::new();
    tree.update_node("/a", dir(100.0), 100.0);
    let node = tree.get_node("/a").expect("exists");
    assert_eq!(node.kind(), NodeKind::Directory);
}

#[test]
fn set_integrity_suspect_applies_to_either_kind() {
    let mut tree = Tree::new();
    tree.update_node("/a.txt", file(100.0, 1), 100.0);
    tree.set_integrity_suspect("/a.txt", true);
    assert!(tree.get_node("/a.txt").unwrap().integrity_suspect());
}
