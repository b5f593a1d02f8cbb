// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! End-to-end spec for `fustor_home()`'s fallback chain (SPEC_FULL
//! §10.1): with neither `FUSTOR_HOME` nor `XDG_CONFIG_HOME` set, it
//! must resolve to `~/.config/fustor` using the same home directory
//! the rest of the user's environment agrees on.

use serial_test::serial;

#[test]
#[serial(fustor_home_env)]
fn falls_back_to_dot_config_fustor_under_the_real_home_dir() {
    std::env::remove_var("FUSTOR_HOME");
    std::env::remove_var("XDG_CONFIG_HOME");

    let resolved = fustor_cli::fustor_home().unwrap();
    let expected = dirs::home_dir().unwrap().join(".config/fustor");
    similar_asserts::assert_eq!(resolved, expected);
}
