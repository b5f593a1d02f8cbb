// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! [`AgentPipe`]: one configured (source, sender) pair and its four
//! supervised tasks (spec §4.6 "Agent Pipe"). `control_loop` only
//! detects role/phase transitions and publishes the pipe's
//! [`DesiredMode`]; `data_supervisor_loop` reacts to that signal and
//! owns the actual spawn/cancel of the leader workflow task, keeping
//! detection and start/stop mechanics in the two tasks the spec names
//! for them.

use crate::backoff::Backoff;
use crate::error::AgentError;
use crate::state::{PipeState, PipeStateCell};
use crate::supervisor::{RestartPolicy, StartOutcome, Supervisor};
use fustor_adapters::{AdapterError, SenderDriver, SourceDriver};
use fustor_config::PipeConfig;
use fustor_core::{AgentId, Event, EventType, MessageSource, PipeId, SessionId, TaskId};
use fustor_wire::{ClientInfo, Command, EventBatch, Role, SentinelUpdate, SourceType};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// `control_loop`'s polling cadence. Not part of `PipeConfig` (spec §6
/// "Config file shapes" names no such knob); the spec's own worked
/// examples imply a sub-second loop.
pub const DEFAULT_CONTROL_LOOP_INTERVAL: Duration = Duration::from_millis(100);

/// `heartbeat_loop`'s cadence, similarly absent from `PipeConfig`.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(10);

/// Brief idle sleep `message_sync` takes between polls once the source
/// reports no new rows, so the realtime tail does not busy-loop.
const MESSAGE_SYNC_IDLE_SLEEP: Duration = Duration::from_millis(200);

/// What `control_loop` thinks the pipe should currently be doing.
/// Published over a `watch` channel so `data_supervisor_loop` reacts
/// without the two tasks sharing a lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DesiredMode {
    Idle,
    LeaderFirstRun,
    LeaderResume,
}

/// One (source, sender) pair (spec §4.6). Generic over the driver
/// traits so tests can swap in `fustor_adapters`'s fakes; production
/// wiring (in `fustor-cli`) instantiates this with the real drivers.
pub struct AgentPipe<S: SourceDriver + ?Sized + 'static, D: SenderDriver + ?Sized + 'static> {
    pub id: PipeId,
    task_id: TaskId,
    source: Arc<S>,
    sender: Arc<D>,
    config: PipeConfig,
    batch_size: usize,
    state: Arc<PipeStateCell>,
    session: Mutex<Option<fustor_adapters::SessionInfo>>,
    role: Mutex<Option<Role>>,
    control_errors: Backoff,
    data_errors: Backoff,
    message_position: AtomicI64,
    has_run_snapshot: AtomicBool,
    commands: Mutex<VecDeque<Command>>,
    desired_tx: watch::Sender<DesiredMode>,
    desired_rx: watch::Receiver<DesiredMode>,
    leader_task: Mutex<Option<(tokio::task::JoinHandle<()>, CancellationToken)>>,
    supervisor: Arc<Supervisor>,
    stop: CancellationToken,
}

impl<S: SourceDriver + ?Sized + 'static, D: SenderDriver + ?Sized + 'static> AgentPipe<S, D> {
    pub fn new(
        id: PipeId,
        agent_id: &AgentId,
        source: Arc<S>,
        sender: Arc<D>,
        config: PipeConfig,
        batch_size: usize,
    ) -> Arc<Self> {
        let task_id = TaskId::new(agent_id, &id);
        let (desired_tx, desired_rx) = watch::channel(DesiredMode::Idle);
        let control_errors = Backoff::new(
            config.error_retry_interval,
            config.backoff_multiplier,
            config.max_backoff_seconds,
            config.max_consecutive_errors,
        );
        let data_errors = Backoff::new(
            config.error_retry_interval,
            config.backoff_multiplier,
            config.max_backoff_seconds,
            config.max_consecutive_errors,
        );
        Arc::new(Self {
            id,
            task_id,
            source,
            sender,
            config,
            batch_size: batch_size.max(1),
            state: Arc::new(PipeStateCell::default()),
            session: Mutex::new(None),
            role: Mutex::new(None),
            control_errors,
            data_errors,
            message_position: AtomicI64::new(0),
            has_run_snapshot: AtomicBool::new(false),
            commands: Mutex::new(VecDeque::new()),
            desired_tx,
            desired_rx,
            leader_task: Mutex::new(None),
            supervisor: Arc::new(Supervisor::new()),
            stop: CancellationToken::new(),
        })
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    pub fn state(&self) -> PipeState {
        self.state.get()
    }

    pub fn role(&self) -> Option<Role> {
        *self.role.lock()
    }

    /// Enqueues a command received out-of-band (spec §4.6 "Commands"),
    /// e.g. one relayed from a management request rather than a
    /// heartbeat reply.
    pub fn enqueue_command(&self, command: Command) {
        self.commands.lock().push_back(command);
    }

    /// Registers and spawns the four supervised tasks (spec §4.6:
    /// `control_loop`, `heartbeat_loop`, `data_supervisor`,
    /// `command_processor`) plus the two periodic consistency sweeps.
    pub fn start(self: &Arc<Self>) -> Vec<StartOutcome> {
        macro_rules! register {
            ($name:literal, $method:ident) => {{
                let pipe = Arc::clone(self);
                self.supervisor.register($name, RestartPolicy::Always, u32::MAX, move || {
                    let pipe = Arc::clone(&pipe);
                    async move { pipe.$method().await }
                });
            }};
        }
        register!("control_loop", control_loop);
        register!("heartbeat_loop", heartbeat_loop);
        register!("data_supervisor", data_supervisor_loop);
        register!("command_processor", command_processor_loop);
        register!("audit_loop", audit_loop);
        register!("sentinel_loop", sentinel_loop);

        let outcomes = self.supervisor.start_all();
        self.supervisor.spawn_health_check_loop(DEFAULT_HEARTBEAT_INTERVAL);
        self.state.set_running(true);
        outcomes
    }

    pub async fn stop(&self) {
        self.stop.cancel();
        if let Some((handle, cancel)) = self.leader_task.lock().take() {
            cancel.cancel();
            let _ = handle.await;
        }
        self.supervisor.stop_all().await;
        self.state.set_stopped();
    }

    /// Detects role/phase transitions and publishes the resulting
    /// [`DesiredMode`]; never touches the source or sender itself
    /// (spec §4.6: "detects role changes, orchestrates phase
    /// transitions").
    async fn control_loop(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(DEFAULT_CONTROL_LOOP_INTERVAL);
        loop {
            tokio::select! {
                _ = self.stop.cancelled() => return,
                _ = ticker.tick() => {}
            }
            let mode = match *self.role.lock() {
                Some(Role::Leader) if !self.has_run_snapshot.load(Ordering::Relaxed) => {
                    DesiredMode::LeaderFirstRun
                }
                Some(Role::Leader) => DesiredMode::LeaderResume,
                _ => DesiredMode::Idle,
            };
            self.desired_tx.send_if_modified(|current| {
                let changed = *current != mode;
                *current = mode;
                changed
            });
        }
    }

    /// Owns the session lease: creates it if missing, then heartbeats
    /// at a fixed cadence, applying role updates and queuing delivered
    /// commands (spec §4.6 "Heartbeat loop").
    async fn heartbeat_loop(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(DEFAULT_HEARTBEAT_INTERVAL);
        loop {
            tokio::select! {
                _ = self.stop.cancelled() => return,
                _ = ticker.tick() => {}
            }

            if self.session.lock().is_none() {
                if let Err(err) = self.establish_session().await {
                    tracing::warn!(pipe = %self.id, error = %err, "failed to establish session");
                    let (delay, _) = self.control_errors.record_failure();
                    tokio::time::sleep(delay).await;
                    continue;
                }
            }

            let session_id = match self.session.lock().as_ref().map(|s| s.session_id) {
                Some(id) => id,
                None => continue,
            };
            let can_realtime = self.has_run_snapshot.load(Ordering::Relaxed);
            match self.sender.heartbeat(session_id, can_realtime).await {
                Ok(reply) => {
                    self.control_errors.reset();
                    if let Some(role) = reply.role {
                        *self.role.lock() = Some(role);
                    }
                    self.commands.lock().extend(reply.commands);
                }
                Err(AdapterError::SessionObsoleted(reason)) => {
                    tracing::warn!(pipe = %self.id, reason = %reason, "session obsoleted");
                    *self.session.lock() = None;
                    self.remap_to_new_bus(true).await;
                }
                Err(err) => {
                    let (delay, just_crossed) = self.control_errors.record_failure();
                    if just_crossed {
                        tracing::error!(pipe = %self.id, error = %err, "control plane degraded, continuing to retry");
                        self.state.insert(PipeState::ERROR);
                    }
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    async fn establish_session(&self) -> Result<(), AgentError> {
        let info = self.sender.create_session(self.task_id.as_str(), ClientInfo::default(), None).await?;
        *self.role.lock() = Some(info.role);
        *self.session.lock() = Some(info);
        Ok(())
    }

    /// Reacts to [`DesiredMode`] changes by starting or stopping the
    /// leader workflow task; owns the only `tokio::spawn`/
    /// `CancellationToken` pair for that task (spec §4.6:
    /// "starts/stops snapshot/message tasks as a function of role +
    /// state").
    async fn data_supervisor_loop(self: Arc<Self>) {
        let mut rx = self.desired_rx.clone();
        loop {
            let mode = *rx.borrow_and_update();
            match mode {
                DesiredMode::Idle => self.stop_leader_workflow().await,
                DesiredMode::LeaderFirstRun | DesiredMode::LeaderResume => {
                    if self.leader_task.lock().is_none() {
                        self.spawn_leader_workflow(mode == DesiredMode::LeaderResume);
                    }
                }
            }
            tokio::select! {
                _ = self.stop.cancelled() => return,
                changed = rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
        }
    }

    fn spawn_leader_workflow(self: &Arc<Self>, resume: bool) {
        let cancel = CancellationToken::new();
        let pipe = Arc::clone(self);
        let cancel_for_task = cancel.clone();
        let handle = tokio::spawn(async move { pipe.run_leader_workflow(cancel_for_task, resume).await });
        *self.leader_task.lock() = Some((handle, cancel));
    }

    async fn stop_leader_workflow(&self) {
        let existing = self.leader_task.lock().take();
        if let Some((handle, cancel)) = existing {
            cancel.cancel();
            let _ = handle.await;
        }
    }

    /// A first-time leader runs `snapshot_sync` then `message_sync`; a
    /// resumed leader fetches the last committed index and goes
    /// straight to `message_sync` (spec §4.6 "Leader, subsequent").
    async fn run_leader_workflow(self: Arc<Self>, cancel: CancellationToken, resume: bool) {
        let Some(session_id) = self.session.lock().as_ref().map(|s| s.session_id) else {
            return;
        };

        if resume {
            match self.sender.get_latest_committed_index(session_id).await {
                Ok(index) => self.message_position.store(index, Ordering::Relaxed),
                Err(err) => {
                    tracing::warn!(pipe = %self.id, error = %err, "failed to resume committed index");
                    return;
                }
            }
        } else if self.snapshot_sync(&cancel, session_id).await.is_ok() {
            self.has_run_snapshot.store(true, Ordering::Relaxed);
        } else {
            return;
        }

        let _ = self.message_sync(&cancel, session_id).await;
    }

    async fn snapshot_sync(&self, cancel: &CancellationToken, session_id: SessionId) -> Result<(), AgentError> {
        self.state.insert(PipeState::SNAPSHOT_SYNC);
        loop {
            if cancel.is_cancelled() {
                self.state.remove(PipeState::SNAPSHOT_SYNC);
                return Err(AgentError::NoSession);
            }
            match self.source.next_snapshot_batch(self.batch_size).await {
                Ok(Some(event)) => {
                    if self.send_with_retry(session_id, event, SourceType::Snapshot, false, None).await.is_err() {
                        self.state.remove(PipeState::SNAPSHOT_SYNC);
                        return Err(AgentError::SessionObsoleted);
                    }
                }
                Ok(None) => {
                    let _ = self
                        .send_with_retry(session_id, self.empty_event(MessageSource::Snapshot), SourceType::Snapshot, true, None)
                        .await;
                    break;
                }
                Err(err) => {
                    tracing::warn!(pipe = %self.id, error = %err, "snapshot source error");
                    let (delay, _) = self.data_errors.record_failure();
                    tokio::time::sleep(delay).await;
                }
            }
        }
        self.state.remove(PipeState::SNAPSHOT_SYNC);
        Ok(())
    }

    async fn message_sync(&self, cancel: &CancellationToken, session_id: SessionId) -> Result<(), AgentError> {
        self.state.insert(PipeState::MESSAGE_SYNC);
        loop {
            if cancel.is_cancelled() {
                self.state.remove(PipeState::MESSAGE_SYNC);
                return Ok(());
            }
            let position = self.message_position.load(Ordering::Relaxed);
            match self.source.next_message_batch(position, self.batch_size).await {
                Ok(Some(event)) => {
                    self.message_position.store(event.index, Ordering::Relaxed);
                    if self.send_with_retry(session_id, event, SourceType::Message, false, None).await.is_err() {
                        self.state.remove(PipeState::MESSAGE_SYNC);
                        return Err(AgentError::SessionObsoleted);
                    }
                }
                Ok(None) => {
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            self.state.remove(PipeState::MESSAGE_SYNC);
                            return Ok(());
                        }
                        _ = tokio::time::sleep(MESSAGE_SYNC_IDLE_SLEEP) => {}
                    }
                }
                Err(err) => {
                    tracing::warn!(pipe = %self.id, error = %err, "message source error");
                    let (delay, _) = self.data_errors.record_failure();
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// One full audit pass: signal start, stream rows until iterator
    /// exhaustion with a terminal `is_end` batch, signal end (spec
    /// §4.6 "Audit").
    async fn audit_loop(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(Duration::from_secs(self.config.audit_interval_sec.max(1)));
        loop {
            tokio::select! {
                _ = self.stop.cancelled() => return,
                _ = ticker.tick() => {}
            }
            if !matches!(*self.role.lock(), Some(Role::Leader)) || !self.has_run_snapshot.load(Ordering::Relaxed) {
                continue;
            }
            let Some(session_id) = self.session.lock().as_ref().map(|s| s.session_id) else {
                continue;
            };
            if let Err(err) = self.run_audit_cycle(session_id).await {
                tracing::warn!(pipe = %self.id, error = %err, "audit cycle failed");
            }
        }
    }

    async fn run_audit_cycle(&self, session_id: SessionId) -> Result<(), AgentError> {
        self.state.insert(PipeState::AUDIT_PHASE);
        self.sender.signal_audit_start(session_id).await?;
        loop {
            match self.source.next_audit_batch(self.batch_size).await? {
                Some(event) => {
                    let _ = self.send_with_retry(session_id, event, SourceType::Audit, false, None).await;
                }
                None => {
                    let _ = self
                        .send_with_retry(session_id, self.empty_event(MessageSource::Audit), SourceType::Audit, true, None)
                        .await;
                    break;
                }
            }
        }
        self.sender.signal_audit_end(session_id).await?;
        self.state.remove(PipeState::AUDIT_PHASE);
        Ok(())
    }

    /// One sentinel sweep: fetch the paths Fusion wants re-checked,
    /// probe the source for their current mtime, report back (spec
    /// §4.6 "Sentinel").
    async fn sentinel_loop(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(Duration::from_secs(self.config.sentinel_interval_sec.max(1)));
        loop {
            tokio::select! {
                _ = self.stop.cancelled() => return,
                _ = ticker.tick() => {}
            }
            if !matches!(*self.role.lock(), Some(Role::Leader)) {
                continue;
            }
            let Some(session_id) = self.session.lock().as_ref().map(|s| s.session_id) else {
                continue;
            };
            if let Err(err) = self.run_sentinel_cycle(session_id).await {
                tracing::warn!(pipe = %self.id, error = %err, "sentinel cycle failed");
            }
        }
    }

    async fn run_sentinel_cycle(&self, session_id: SessionId) -> Result<(), AgentError> {
        let tasks = self.sender.get_sentinel_tasks(session_id).await?;
        if tasks.is_empty() {
            return Ok(());
        }
        self.state.insert(PipeState::SENTINEL_SWEEP);
        let results = self.source.perform_sentinel_check(&tasks).await?;
        let updates =
            results.into_iter().map(|(path, mtime)| SentinelUpdate { path, mtime, size: None }).collect();
        self.sender.submit_sentinel_results(session_id, updates).await?;
        self.state.remove(PipeState::SENTINEL_SWEEP);
        Ok(())
    }

    /// Drains queued commands (delivered via heartbeat replies or
    /// [`Self::enqueue_command`]) at a light polling cadence (spec
    /// §4.6 "Commands").
    async fn command_processor_loop(self: Arc<Self>) {
        loop {
            tokio::select! {
                _ = self.stop.cancelled() => return,
                _ = tokio::time::sleep(Duration::from_millis(50)) => {}
            }
            let command = self.commands.lock().pop_front();
            if let Some(command) = command {
                self.handle_command(command).await;
            }
        }
    }

    async fn handle_command(&self, command: Command) {
        match command {
            Command::Scan { path, recursive, job_id } => self.run_scan(&path, recursive, &job_id).await,
            Command::StopPipe { pipe_id } if pipe_id == self.id.to_string() => self.stop.cancel(),
            Command::StopPipe { .. } => {}
            // `reload_config`/`update_config`/`report_config`/`upgrade` act on
            // the whole Agent host, not one pipe; the host-level command
            // dispatcher owns them.
            other => tracing::debug!(pipe = %self.id, command = ?other, "command not handled at pipe scope"),
        }
    }

    async fn run_scan(&self, path: &str, recursive: bool, job_id: &str) {
        let Some(session_id) = self.session.lock().as_ref().map(|s| s.session_id) else {
            return;
        };
        loop {
            match self.source.next_scan_batch(path, recursive, self.batch_size).await {
                Ok(Some(event)) => {
                    if self.send_with_retry(session_id, event, SourceType::Snapshot, false, None).await.is_err() {
                        return;
                    }
                }
                Ok(None) => {
                    let metadata = HashMap::from([
                        ("scan_path".to_string(), serde_json::json!(path)),
                        ("job_id".to_string(), serde_json::json!(job_id)),
                    ]);
                    let _ = self
                        .send_with_retry(
                            session_id,
                            self.empty_event(MessageSource::Realtime),
                            SourceType::ScanComplete,
                            true,
                            Some(metadata),
                        )
                        .await;
                    return;
                }
                Err(err) => {
                    tracing::warn!(pipe = %self.id, error = %err, "scan batch error");
                    return;
                }
            }
        }
    }

    fn empty_event(&self, source: MessageSource) -> Event {
        Event::new(EventType::Insert, "fs", "files", Vec::new(), Vec::new(), source, self.message_position.load(Ordering::Relaxed))
    }

    /// Tags `event` with this pipe's id (spec §4.7 "Fusion Pipe" keys
    /// per-pipe counters off it) and sends it, retrying under the
    /// data-plane backoff until it succeeds, the session is obsoleted,
    /// or the pipe is stopped.
    async fn send_with_retry(
        &self,
        session_id: SessionId,
        event: Event,
        source_type: SourceType,
        is_end: bool,
        batch_metadata: Option<HashMap<String, serde_json::Value>>,
    ) -> Result<(), AgentError> {
        let mut metadata = event.metadata.clone().unwrap_or_default();
        metadata.insert("pipe_id".to_string(), serde_json::json!(self.id.to_string()));
        let mut tagged = event;
        tagged.metadata = Some(metadata);
        let batch = EventBatch { events: vec![tagged], source_type, is_end, metadata: batch_metadata };

        loop {
            if self.stop.is_cancelled() {
                return Err(AgentError::NoSession);
            }
            match self.sender.send_batch(session_id, batch.clone()).await {
                Ok(_) => {
                    self.data_errors.reset();
                    return Ok(());
                }
                Err(AdapterError::SessionObsoleted(reason)) => {
                    tracing::warn!(pipe = %self.id, reason = %reason, "send rejected, session obsoleted");
                    *self.session.lock() = None;
                    self.remap_to_new_bus(true).await;
                    return Err(AgentError::SessionObsoleted);
                }
                Err(err) => {
                    let (delay, just_crossed) = self.data_errors.record_failure();
                    if just_crossed {
                        tracing::error!(pipe = %self.id, error = %err, "data plane degraded, continuing to retry");
                        self.state.insert(PipeState::ERROR);
                    }
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Reconnects the pipe to a fresh bus position (spec §4.8 "Remap"):
    /// when `needed_position_lost`, the in-flight leader workflow is
    /// cancelled, `has_run_snapshot` is cleared so the next
    /// `LeaderFirstRun` restarts from a clean snapshot, and
    /// `control_loop`'s next tick recomputes the desired mode.
    async fn remap_to_new_bus(&self, needed_position_lost: bool) {
        if !needed_position_lost {
            return;
        }
        self.stop_leader_workflow().await;
        self.state.insert(PipeState::RECONNECTING);
        self.has_run_snapshot.store(false, Ordering::Relaxed);
        self.desired_tx.send_replace(DesiredMode::Idle);
        self.state.remove(PipeState::RECONNECTING);
    }
}

#[cfg(test)]
#[path = "pipe_tests.rs"]
mod tests;
