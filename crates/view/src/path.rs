// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! POSIX-style path decomposition used to walk the parent chain.
//! Operates on plain `/`-separated strings; never touches the real
//! filesystem (the tree is purely in-memory).

pub const ROOT: &str = "/";

/// Parent of `path`, or `None` if `path` is the root.
pub fn parent_of(path: &str) -> Option<String> {
    if path == ROOT {
        return None;
    }
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) => Some(ROOT.to_string()),
        Some(idx) => Some(trimmed[..idx].to_string()),
        None => Some(ROOT.to_string()),
    }
}

/// Base name (last path component) of `path`.
pub fn base_name(path: &str) -> &str {
    if path == ROOT {
        return ROOT;
    }
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Join a parent path and a direct child's base name.
pub fn join(parent: &str, name: &str) -> String {
    if parent == ROOT {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
