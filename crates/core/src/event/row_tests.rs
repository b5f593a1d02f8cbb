// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

use super::*;
use serde_json::json;

fn raw(extra: &[(&str, Value)]) -> HashMap<String, Value> {
    let mut map = HashMap::new();
    map.insert("path".to_string(), json!("/data/a.txt"));
    map.insert("modified_time".to_string(), json!(1900.5));
    map.insert("size".to_string(), json!(1024));
    map.insert("is_directory".to_string(), json!(false));
    for (k, v) in extra {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

#[test]
fn parses_required_fields() {
    let row = FsRow::from_raw(&raw(&[])).expect("required fields present");
    assert_eq!(row.path, "/data/a.txt");
    assert_eq!(row.modified_time, 1900.5);
    assert_eq!(row.size, 1024);
    assert!(!row.is_directory);
    assert_eq!(row.file_name, None);
    assert_eq!(row.is_atomic_write, None);
}

#[test]
fn parses_optional_fields_when_present() {
    let row = FsRow::from_raw(&raw(&[
        ("file_name", json!("a.txt")),
        ("created_time", json!(1800.0)),
        ("parent_path", json!("/data")),
        ("parent_mtime", json!(1850.0)),
        ("is_atomic_write", json!(true)),
    ]))
    .expect("required fields present");
    assert_eq!(row.file_name.as_deref(), Some("a.txt"));
    assert_eq!(row.created_time, Some(1800.0));
    assert_eq!(row.parent_path.as_deref(), Some("/data"));
    assert_eq!(row.parent_mtime, Some(1850.0));
    assert_eq!(row.is_atomic_write, Some(true));
}

#[test]
fn missing_required_field_returns_none() {
    let mut map = raw(&[]);
    map.remove("modified_time");
    assert!(FsRow::from_raw(&map).is_none());
}

#[test]
fn wrong_type_on_required_field_returns_none() {
    let map = raw(&[("size", json!("not-a-number"))]);
    assert!(FsRow::from_raw(&map).is_none());
}
