use super::*;
use fustor_core::{Event, EventType, MessageSource};
use fustor_wire::SourceType;

fn empty_batch(source_type: SourceType) -> EventBatch {
    EventBatch {
        events: vec![Event::new(
            EventType::Insert,
            "fs",
            "files",
            vec!["path".to_string()],
            Vec::new(),
            MessageSource::Realtime,
            0,
        )],
        source_type,
        is_end: false,
        metadata: None,
    }
}

#[tokio::test]
async fn create_session_reports_seeded_role() {
    let sender = FakeSenderDriver::new();
    sender.set_role(Role::Leader);

    let info = sender
        .create_session("agt-1:pip-1", ClientInfo::default(), None)
        .await
        .expect("create_session");

    assert_eq!(info.role, Role::Leader);
}

#[tokio::test]
async fn heartbeat_replays_queued_replies_then_falls_back() {
    let sender = FakeSenderDriver::new();
    sender.queue_heartbeat_reply(HeartbeatReply {
        role: Some(Role::Leader),
        can_realtime: None,
        commands: vec![Command::ReloadConfig],
    });
    sender.set_role(Role::Follower);

    let first = sender.heartbeat(SessionId::new(), true).await.expect("hb");
    assert_eq!(first.role, Some(Role::Leader));
    assert_eq!(first.commands, vec![Command::ReloadConfig]);

    let second = sender.heartbeat(SessionId::new(), true).await.expect("hb");
    assert_eq!(second.role, Some(Role::Follower));
    assert!(second.commands.is_empty());
}

#[tokio::test]
async fn obsoleted_sender_rejects_heartbeat_and_batch() {
    let sender = FakeSenderDriver::new();
    sender.obsolete_session();

    let hb = sender.heartbeat(SessionId::new(), false).await;
    assert!(matches!(hb, Err(AdapterError::SessionObsoleted(_))));

    let send = sender.send_batch(SessionId::new(), empty_batch(SourceType::Message)).await;
    assert!(matches!(send, Err(AdapterError::SessionObsoleted(_))));
}

#[tokio::test]
async fn audit_signals_and_sentinel_feedback_are_recorded() {
    let sender = FakeSenderDriver::new();
    let session_id = SessionId::new();

    sender.signal_audit_start(session_id).await.expect("start");
    sender.signal_audit_end(session_id).await.expect("end");
    assert_eq!(sender.audit_start_count(), 1);
    assert_eq!(sender.audit_end_count(), 1);

    sender
        .submit_sentinel_results(
            session_id,
            vec![SentinelUpdate { path: "/f".to_string(), mtime: 1.0, size: None }],
        )
        .await
        .expect("feedback");
    assert_eq!(sender.sentinel_feedback().len(), 1);
}

#[tokio::test]
async fn send_batch_records_batch_and_returns_event_count() {
    let sender = FakeSenderDriver::new();
    let batch = empty_batch(SourceType::Snapshot);

    let count = sender.send_batch(SessionId::new(), batch).await.expect("send");
    assert_eq!(count, 1);
    assert_eq!(sender.sent_batches().len(), 1);
}
