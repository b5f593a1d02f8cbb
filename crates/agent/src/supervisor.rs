// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! Generic component supervisor (spec §4.9, C9). An Agent Pipe
//! registers its four long-lived tasks here; `fustor-cli` registers
//! one Agent Pipe per configured pipe the same way.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

type Spawner = Arc<dyn Fn() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartPolicy {
    Never,
    OnFailure,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComponentStatus {
    Running,
    Degraded,
    Stopped,
}

/// Outcome of one component's `start_all()` attempt (spec §4.9).
#[derive(Debug, Clone)]
pub struct StartOutcome {
    pub component_id: String,
    pub success: bool,
    pub error: Option<String>,
}

struct Component {
    spawn: Spawner,
    policy: RestartPolicy,
    max_restarts: u32,
    restart_count: AtomicU32,
    handle: Option<JoinHandle<()>>,
    status: ComponentStatus,
}

/// Fault-isolated start/stop of N components with independent restart
/// policies (spec §4.9). Not `Clone`; share via `Arc<Supervisor>`.
pub struct Supervisor {
    components: Mutex<HashMap<String, Component>>,
    health_task: Mutex<Option<JoinHandle<()>>>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self { components: Mutex::new(HashMap::new()), health_task: Mutex::new(None) }
    }

    /// Registers a component. `spawn` is called once per (re)start and
    /// must return a future that runs for the component's lifetime.
    pub fn register<F, Fut>(&self, id: impl Into<String>, policy: RestartPolicy, max_restarts: u32, spawn: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let spawn: Spawner = Arc::new(move || Box::pin(spawn()));
        self.components.lock().insert(
            id.into(),
            Component {
                spawn,
                policy,
                max_restarts,
                restart_count: AtomicU32::new(0),
                handle: None,
                status: ComponentStatus::Stopped,
            },
        );
    }

    /// Spawns every registered component. A component that panics on
    /// spawn does not prevent the others from starting (spec §4.9).
    pub fn start_all(&self) -> Vec<StartOutcome> {
        let mut components = self.components.lock();
        components
            .iter_mut()
            .map(|(id, component)| {
                let handle = tokio::spawn((component.spawn)());
                component.handle = Some(handle);
                component.status = ComponentStatus::Running;
                StartOutcome { component_id: id.clone(), success: true, error: None }
            })
            .collect()
    }

    /// Periodically checks every component's task for an unexpected
    /// exit and restarts per its policy (spec §4.9 `health_check_loop`).
    pub async fn run_health_check_loop(self: Arc<Self>, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            self.sweep_unhealthy();
        }
    }

    fn sweep_unhealthy(&self) {
        let mut components = self.components.lock();
        for (id, component) in components.iter_mut() {
            if component.status != ComponentStatus::Running {
                continue;
            }
            let finished = component.handle.as_ref().is_some_and(|h| h.is_finished());
            if !finished {
                continue;
            }
            component.status = ComponentStatus::Degraded;
            tracing::warn!(component = %id, "supervised task exited unexpectedly");

            let restarts = component.restart_count.load(Ordering::Relaxed);
            let should_restart = match component.policy {
                RestartPolicy::Never => false,
                RestartPolicy::OnFailure | RestartPolicy::Always => restarts < component.max_restarts,
            };
            if should_restart {
                component.restart_count.fetch_add(1, Ordering::Relaxed);
                component.handle = Some(tokio::spawn((component.spawn)()));
                component.status = ComponentStatus::Running;
                tracing::info!(component = %id, restarts = restarts + 1, "restarted");
            }
        }
    }

    /// Starts the background health-check loop under `self`.
    pub fn spawn_health_check_loop(self: &Arc<Self>, interval: Duration) {
        let handle = tokio::spawn(Arc::clone(self).run_health_check_loop(interval));
        *self.health_task.lock() = Some(handle);
    }

    /// Cancels the health task, then cancels every component in
    /// parallel, absorbing per-component errors (spec §4.9).
    pub async fn stop_all(&self) {
        if let Some(health) = self.health_task.lock().take() {
            health.abort();
        }
        let handles: Vec<JoinHandle<()>> = {
            let mut components = self.components.lock();
            components
                .values_mut()
                .filter_map(|component| {
                    component.status = ComponentStatus::Stopped;
                    component.handle.take()
                })
                .collect()
        };
        for handle in handles {
            handle.abort();
            let _ = handle.await;
        }
    }

    pub fn restart_count(&self, id: &str) -> Option<u32> {
        self.components.lock().get(id).map(|c| c.restart_count.load(Ordering::Relaxed))
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
