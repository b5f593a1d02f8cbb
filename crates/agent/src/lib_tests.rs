// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Fustor Authors

use super::*;
use fustor_adapters::{FakeSenderDriver, FakeSourceDriver};

fn single_pipe_config() -> AgentConfig {
    serde_yaml::from_str(
        r#"
agent_id: agt-test000000000000001
sources:
  src1:
    driver: fake
    uri: fake://src1
senders:
  snd1:
    driver: fake
    uri: fake://snd1
    credential: none
    batch_size: 25
pipes:
  pipe1:
    source: src1
    sender: snd1
"#,
    )
    .expect("valid yaml")
}

fn drivers() -> (HashMap<String, Arc<dyn SourceDriver>>, HashMap<String, Arc<dyn SenderDriver>>) {
    let mut sources: HashMap<String, Arc<dyn SourceDriver>> = HashMap::new();
    sources.insert("src1".to_string(), Arc::new(FakeSourceDriver::new()));
    let mut senders: HashMap<String, Arc<dyn SenderDriver>> = HashMap::new();
    senders.insert("snd1".to_string(), Arc::new(FakeSenderDriver::new()));
    (sources, senders)
}

#[test]
fn builds_one_pipe_per_enabled_config_entry() {
    let config = single_pipe_config();
    let (sources, senders) = drivers();
    let host = AgentHost::from_config(&config, PathBuf::from("/tmp"), &sources, &senders).expect("host");
    assert_eq!(host.pipe_keys().collect::<Vec<_>>(), vec!["pipe1"]);
    assert!(host.pipe("pipe1").is_some());
}

#[test]
fn missing_driver_wiring_is_rejected() {
    let config = single_pipe_config();
    let (_, senders) = drivers();
    let empty_sources: HashMap<String, Arc<dyn SourceDriver>> = HashMap::new();
    let err = AgentHost::from_config(&config, PathBuf::from("/tmp"), &empty_sources, &senders).unwrap_err();
    assert!(matches!(err, AgentError::Degraded(_)));
}

#[tokio::test]
async fn update_config_then_report_config_round_trips_through_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = single_pipe_config();
    let (sources, senders) = drivers();
    let host =
        AgentHost::from_config(&config, dir.path().to_path_buf(), &sources, &senders).expect("host");

    host.dispatch(Command::UpdateConfig {
        config_yaml: "pipes: {}\n".to_string(),
        filename: "agent.yaml".to_string(),
    });

    let contents = host.report_config("agent.yaml").expect("report");
    assert_eq!(contents, "pipes: {}\n");
}
