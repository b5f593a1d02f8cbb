// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

use super::*;
use std::sync::atomic::AtomicUsize;

#[tokio::test]
async fn start_all_spawns_every_component_independently() {
    let sup = Supervisor::new();
    let runs = Arc::new(AtomicUsize::new(0));
    let r = Arc::clone(&runs);
    sup.register("a", RestartPolicy::Never, 0, move || {
        let r = Arc::clone(&r);
        async move {
            r.fetch_add(1, Ordering::Relaxed);
            std::future::pending::<()>().await;
        }
    });
    sup.register("b", RestartPolicy::Never, 0, || async {
        std::future::pending::<()>().await;
    });

    let outcomes = sup.start_all();
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.success));

    tokio::task::yield_now().await;
    assert_eq!(runs.load(Ordering::Relaxed), 1);

    sup.stop_all().await;
}

#[tokio::test]
async fn on_failure_policy_restarts_up_to_max_restarts() {
    let sup = Arc::new(Supervisor::new());
    sup.register("flaky", RestartPolicy::OnFailure, 2, || async {});
    sup.start_all();

    // Give the spawned (already-finished) task a moment to register as
    // finished, then sweep twice to exhaust the restart budget.
    tokio::time::sleep(Duration::from_millis(10)).await;
    sup.sweep_unhealthy();
    assert_eq!(sup.restart_count("flaky"), Some(1));

    tokio::time::sleep(Duration::from_millis(10)).await;
    sup.sweep_unhealthy();
    assert_eq!(sup.restart_count("flaky"), Some(2));

    tokio::time::sleep(Duration::from_millis(10)).await;
    sup.sweep_unhealthy();
    assert_eq!(sup.restart_count("flaky"), Some(2));

    sup.stop_all().await;
}

#[tokio::test]
async fn never_policy_does_not_restart() {
    let sup = Supervisor::new();
    sup.register("oneshot", RestartPolicy::Never, 5, || async {});
    sup.start_all();
    tokio::time::sleep(Duration::from_millis(10)).await;
    sup.sweep_unhealthy();
    assert_eq!(sup.restart_count("oneshot"), Some(0));
    sup.stop_all().await;
}
