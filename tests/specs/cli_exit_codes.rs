// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Black-box exit-code specs for the two `fustor-cli` binaries (spec
//! §6 "Exit codes: 0 = clean shutdown; non-zero reserved for
//! initialization failures").

use crate::prelude::*;

#[test]
fn fustord_exits_nonzero_on_missing_config() {
    cli_bin("fustord")
        .args(["--config", "/nonexistent/fusion.yaml"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn fustor_agentd_exits_nonzero_on_missing_config() {
    cli_bin("fustor-agentd")
        .args(["--config", "/nonexistent/agent.yaml"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn fustord_exits_nonzero_on_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fusion.yaml");
    // `pipes.p1` references a source, sender, and view that were never
    // declared — the Config Validator (spec §4.10) must reject this.
    std::fs::write(
        &path,
        "fusion_id: f1\npipes:\n  p1:\n    source: s1\n    sender: se1\n    view: missing\n",
    )
    .unwrap();

    cli_bin("fustord").args(["--config", path.to_str().unwrap()]).assert().failure().code(2);
}
