// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

//! [`FusionHost`]: the Fusion Pipe (spec §4.7) entry point a receiver
//! (whatever transport binding is in front of it, per spec §1
//! Non-goals) hands decoded [`Request`]s to. Builds its views and
//! per-pipe routing table from a [`FusionConfig`], owns the shared
//! [`SessionManager`], and dispatches every request variant to the
//! matching session, queue, or signal-routing behavior.

use crate::pipe::PipeEntry;
use crate::worker::ViewWorker;
use crate::FusionError;
use fustor_config::{validate_fusion_config, FusionConfig};
use fustor_core::ids::ViewId;
use fustor_core::SessionId;
use fustor_session::SessionManager;
use fustor_view::{Arbitrator, AuditManager, View};
use fustor_wire::{Command, Request, Response, SourceType};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Invoked when a `source_type=scan_complete` batch arrives (spec §4.7
/// "Signal routing"), with the originating session and the scanned
/// path (if the batch's metadata carried one).
pub type ScanCompleteHandler = Arc<dyn Fn(SessionId, Option<String>) + Send + Sync>;

struct ViewEntry {
    worker: ViewWorker,
    require_snapshot_complete: bool,
}

/// Top-level Fusion Pipe host: owns every configured view and the
/// pipe-id → view routing table, and is the single point a receiver
/// hands requests to (spec §4.7).
pub struct FusionHost {
    sessions: Arc<SessionManager>,
    views: HashMap<ViewId, ViewEntry>,
    pipes: HashMap<String, PipeEntry>,
    view_timeouts: HashMap<ViewId, Duration>,
    view_allow_concurrent_push: HashMap<ViewId, bool>,
    scan_complete_handler: Mutex<Option<ScanCompleteHandler>>,
}

impl FusionHost {
    /// Validates `config` (spec §4.10) then builds one [`ViewWorker`]
    /// per configured view and a pipe-id → view routing table from
    /// `config.pipes`.
    pub fn from_config(config: &FusionConfig) -> Result<Self, FusionError> {
        validate_fusion_config(config)?;

        let mut views = HashMap::new();
        let mut view_timeouts = HashMap::new();
        let mut view_allow_concurrent_push = HashMap::new();
        let mut view_ids_by_key = HashMap::new();
        for (key, view_cfg) in &config.views {
            let view_id = ViewId::from_string(key);
            let audit = AuditManager::new(view_cfg.tombstone_ttl_seconds as f64);
            let view = View::with_components(fustor_core::SystemClock, Arbitrator::default(), audit);
            views.insert(
                view_id.clone(),
                ViewEntry {
                    worker: ViewWorker::spawn(view),
                    require_snapshot_complete: view_cfg.require_snapshot_complete,
                },
            );
            view_timeouts.insert(view_id.clone(), Duration::from_secs(view_cfg.session_timeout_seconds));
            view_allow_concurrent_push.insert(view_id.clone(), view_cfg.allow_concurrent_push);
            view_ids_by_key.insert(key.clone(), view_id);
        }

        let mut pipes = HashMap::new();
        for (pipe_id, pipe_cfg) in &config.pipes {
            let Some(view_key) = &pipe_cfg.view else {
                return Err(FusionError::PipeHasNoView(pipe_id.clone()));
            };
            let view_id = view_ids_by_key
                .get(view_key)
                .cloned()
                .ok_or_else(|| FusionError::UnknownView(view_key.clone()))?;
            let worker = views
                .get(&view_id)
                .map(|entry| entry.worker.clone())
                .ok_or_else(|| FusionError::UnknownView(view_key.clone()))?;
            pipes.insert(
                pipe_id.clone(),
                PipeEntry::new(
                    pipe_id.clone(),
                    pipe_cfg.source.clone(),
                    pipe_cfg.sender.clone(),
                    pipe_cfg.disabled,
                    view_id,
                    worker,
                ),
            );
        }

        Ok(Self {
            sessions: Arc::new(SessionManager::new(Duration::from_secs(30))),
            views,
            pipes,
            view_timeouts,
            view_allow_concurrent_push,
            scan_complete_handler: Mutex::new(None),
        })
    }

    pub fn set_scan_complete_handler(&self, handler: ScanCompleteHandler) {
        *self.scan_complete_handler.lock() = Some(handler);
    }

    pub fn sessions(&self) -> Arc<SessionManager> {
        Arc::clone(&self.sessions)
    }

    /// Resolves `task_id` (`"agent_id:pipe_id"`, spec §3 "Session") to
    /// the view its pipe feeds. A receiver calls this once, on
    /// `create_session`, and threads the resulting [`ViewId`] through
    /// subsequent requests for that session — `SessionManager` itself
    /// is keyed by view, not by a global session table (spec §4.5), so
    /// every other request needs it too.
    pub fn resolve_view_for_task(&self, task_id: &str) -> Result<ViewId, FusionError> {
        let pipe_id = task_id
            .split_once(':')
            .map(|(_, pipe)| pipe)
            .ok_or_else(|| FusionError::MalformedTaskId(task_id.to_string()))?;
        self.pipes
            .get(pipe_id)
            .map(|pipe| pipe.view_id.clone())
            .ok_or_else(|| FusionError::UnknownPipe(pipe_id.to_string()))
    }

    /// Dispatches one decoded [`Request`] against `view_id` (spec
    /// §4.7). The caller supplies `view_id` (resolved once via
    /// [`Self::resolve_view_for_task`] and cached alongside the wire
    /// session) since requests after `create_session` carry no view
    /// reference of their own.
    pub async fn handle(&self, view_id: ViewId, request: Request) -> Response {
        match request {
            Request::CreateSession { task_id, client_info, session_timeout_seconds } => {
                self.create_session(view_id, task_id, client_info, session_timeout_seconds)
            }
            Request::Heartbeat { session_id, can_realtime } => {
                self.heartbeat(view_id, session_id, can_realtime)
            }
            Request::TerminateSession { session_id } => self.terminate_session(view_id, session_id),
            Request::Ingest { session_id, batch } => self.ingest(view_id, session_id, batch).await,
            Request::AuditStart { session_id: _ } => {
                if let Some(entry) = self.views.get(&view_id) {
                    entry.worker.open_audit();
                }
                Response::Ok
            }
            Request::AuditEnd { session_id: _, task_id: _ } => match self.views.get(&view_id) {
                Some(entry) => match entry.worker.close_audit().await {
                    Ok(()) => Response::Ok,
                    Err(e) => Response::Error { message: e.to_string() },
                },
                None => {
                    Response::Error { message: FusionError::UnknownView(view_id.to_string()).to_string() }
                }
            },
            Request::SentinelFeedback { session_id: _, updates } => {
                if let Some(entry) = self.views.get(&view_id) {
                    for update in updates {
                        let _ = entry.worker.feed_suspect(update.path, update.mtime).await;
                    }
                }
                Response::Ok
            }
            Request::SentinelTasks { session_id: _ } => {
                let paths = self
                    .views
                    .get(&view_id)
                    .map(|entry| {
                        entry
                            .worker
                            .take_expired_suspects()
                            .into_iter()
                            .map(|path| fustor_wire::SentinelTask { path, expected_mtime: 0.0 })
                            .collect()
                    })
                    .unwrap_or_default();
                Response::SentinelTasks { paths }
            }
            Request::ManagementPipes => {
                Response::ManagementPipes { pipes: self.pipes.values().map(PipeEntry::summary).collect() }
            }
            Request::ManagementPipeDetail { pipe_id } => {
                Response::ManagementPipeDetail { pipe: self.pipes.get(&pipe_id).map(PipeEntry::summary) }
            }
            Request::ManagementStats => {
                Response::ManagementStats { stats: self.pipes.values().map(PipeEntry::stats).collect() }
            }
            Request::ManagementAgentCommand { agent_id: _, command } => self.dispatch_command(command),
            Request::ManagementReload => Response::Ok,
        }
    }

    fn create_session(
        &self,
        view_id: ViewId,
        task_id: String,
        client_info: Option<fustor_wire::ClientInfo>,
        session_timeout_seconds: Option<u64>,
    ) -> Response {
        let ceiling = self.view_timeouts.get(&view_id).copied().unwrap_or(Duration::from_secs(30));
        let requested = session_timeout_seconds.map(Duration::from_secs).unwrap_or(ceiling).min(ceiling);
        let allow_concurrent_push = self.view_allow_concurrent_push.get(&view_id).copied().unwrap_or(false);
        let task = fustor_core::ids::TaskId(task_id);

        match self.sessions.create_session(
            view_id,
            task,
            client_info.unwrap_or_default(),
            Some(requested),
            allow_concurrent_push,
            Instant::now(),
        ) {
            Ok((session_id, role, timeout)) => Response::SessionCreated {
                session_id: session_id.to_string(),
                role,
                session_timeout_seconds: timeout.as_secs(),
                message: None,
            },
            Err(e) => Response::Error { message: e.to_string() },
        }
    }

    fn heartbeat(&self, view_id: ViewId, session_id: String, can_realtime: bool) -> Response {
        let Ok(session_id) = SessionId::parse(&session_id) else {
            return Response::SessionObsoleted;
        };
        match self.sessions.heartbeat(&view_id, session_id, can_realtime, Instant::now()) {
            Ok(role) => Response::HeartbeatAck { role: Some(role), message: None, commands: Vec::new() },
            Err(_) => Response::SessionObsoleted,
        }
    }

    fn terminate_session(&self, view_id: ViewId, session_id: String) -> Response {
        if let Ok(session_id) = SessionId::parse(&session_id) {
            self.sessions.terminate_session(&view_id, session_id);
        }
        Response::Ok
    }

    async fn ingest(&self, view_id: ViewId, session_id: String, batch: fustor_wire::EventBatch) -> Response {
        let Ok(parsed_session) = SessionId::parse(&session_id) else {
            return Response::SessionObsoleted;
        };
        let Some(entry) = self.views.get(&view_id) else {
            return Response::Error { message: FusionError::UnknownView(view_id.to_string()).to_string() };
        };

        // Snapshot-end and scan-complete are control signals, not
        // tree-affecting batches; audit-end has its own `Request`
        // variant and carries no event batch.
        if batch.source_type == SourceType::Snapshot && batch.is_end {
            self.sessions.set_snapshot_complete(&view_id, parsed_session);
            return Response::Ok;
        }
        if batch.source_type == SourceType::ScanComplete {
            if let Some(handler) = self.scan_complete_handler.lock().clone() {
                let scan_path = batch
                    .metadata
                    .as_ref()
                    .and_then(|m| m.get("scan_path"))
                    .and_then(|v| v.as_str().map(str::to_string));
                handler(parsed_session, scan_path);
            }
            return Response::Ok;
        }

        let pipe = batch.events.first().and_then(|e| e.pipe_id()).and_then(|id| self.pipes.get(id));
        let count = batch.events.len() as u64;
        for event in batch.events {
            if entry.worker.enqueue(event).await.is_err() {
                if let Some(pipe) = pipe {
                    pipe.record_error();
                }
                return Response::Error { message: FusionError::WorkerGone.to_string() };
            }
        }
        if let Some(pipe) = pipe {
            pipe.record_received(count);
            pipe.record_processed(count);
        }
        Response::IngestAck { count: count as usize }
    }

    fn dispatch_command(&self, _command: Command) -> Response {
        // Management-initiated agent commands are relayed to the Agent
        // on its next heartbeat reply by whatever holds the receiving
        // transport's session table; the core only validates the shape.
        Response::Ok
    }

    pub fn is_snapshot_complete(&self, view_id: &ViewId) -> bool {
        match self.views.get(view_id) {
            Some(entry) if entry.require_snapshot_complete => self.sessions.is_snapshot_complete(view_id),
            _ => true,
        }
    }

    pub fn node_kind(&self, view_id: &ViewId, path: &str) -> Option<fustor_view::NodeKind> {
        self.views.get(view_id)?.worker.node_kind(path)
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
