// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Scenario S6 (spec §8): when the leader session terminates, the
//! surviving follower claims leadership on its next `can_realtime`
//! heartbeat.

use crate::prelude::*;
use fustor_core::ids::{TaskId, ViewId};

#[test]
fn follower_becomes_leader_after_leader_session_terminates() {
    let manager = SessionManager::new(Duration::from_secs(30));
    let view_id = ViewId::from_string("v1");
    let now = Instant::now();

    let (s1, role1, _) = manager
        .create_session(view_id.clone(), TaskId("agent1:pipe1".to_string()), ClientInfo::default(), None, false, now)
        .unwrap();
    assert_eq!(role1, Role::Leader);

    let (s2, role2, _) = manager
        .create_session(view_id.clone(), TaskId("agent2:pipe2".to_string()), ClientInfo::default(), None, false, now)
        .unwrap();
    assert_eq!(role2, Role::Follower);

    manager.terminate_session(&view_id, s1);

    let role = manager.heartbeat(&view_id, s2, true, now).unwrap();
    assert_eq!(role, Role::Leader);
}
