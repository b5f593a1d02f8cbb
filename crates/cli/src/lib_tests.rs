// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

use super::*;
use fustor_config::FusionConfig;
use serial_test::serial;
use std::io::Write;

#[test]
fn load_yaml_config_parses_a_minimal_fusion_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "fusion_id: f1").unwrap();
    let config: FusionConfig = load_yaml_config(file.path()).unwrap();
    assert_eq!(config.fusion_id.as_deref(), Some("f1"));
}

#[test]
fn load_yaml_config_reports_missing_file_as_exit_code_2() {
    let err = load_yaml_config::<FusionConfig>(std::path::Path::new("/nonexistent/fusor.yaml")).unwrap_err();
    assert_eq!(err.code, 2);
}

#[test]
fn load_yaml_config_reports_malformed_yaml_as_exit_code_2() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "not: [valid").unwrap();
    let err = load_yaml_config::<FusionConfig>(file.path()).unwrap_err();
    assert_eq!(err.code, 2);
}

#[test]
#[serial(fustor_home_env)]
fn fustor_home_prefers_fustor_home_env_var() {
    std::env::set_var("FUSTOR_HOME", "/tmp/fustor-explicit");
    std::env::remove_var("XDG_CONFIG_HOME");
    let home = fustor_home().unwrap();
    assert_eq!(home, std::path::PathBuf::from("/tmp/fustor-explicit"));
    std::env::remove_var("FUSTOR_HOME");
}

#[test]
#[serial(fustor_home_env)]
fn fustor_home_falls_back_to_xdg_config_home() {
    std::env::remove_var("FUSTOR_HOME");
    std::env::set_var("XDG_CONFIG_HOME", "/tmp/xdg-cfg");
    let home = fustor_home().unwrap();
    assert_eq!(home, std::path::PathBuf::from("/tmp/xdg-cfg/fustor"));
    std::env::remove_var("XDG_CONFIG_HOME");
}
