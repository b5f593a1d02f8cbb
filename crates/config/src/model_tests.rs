use super::*;

#[test]
fn minimal_agent_config_parses_with_defaults() {
    let yaml = r#"
sources:
  local:
    driver: fs
    uri: "file:///data"
senders:
  fusion:
    driver: http
    uri: "https://fusion.example/ingest"
    credential: tok
pipes:
  main:
    source: local
    sender: fusion
"#;
    let config: AgentConfig = serde_yaml::from_str(yaml).expect("parse");
    assert_eq!(config.agent_id, None);
    assert_eq!(config.sources["local"].driver, "fs");
    assert_eq!(config.senders["fusion"].batch_size, 100);
    assert_eq!(config.pipes["main"].audit_interval_sec, 3600);
    assert!(!config.pipes["main"].disabled);
}

#[test]
fn fusion_config_round_trips_through_yaml() {
    let mut config = FusionConfig::default();
    config.fusion_id = Some("fusion-1".to_string());
    config.views.insert(
        "tree".to_string(),
        ViewConfig { allow_concurrent_push: true, ..ViewConfig::default() },
    );

    let yaml = serde_yaml::to_string(&config).expect("serialize");
    let parsed: FusionConfig = serde_yaml::from_str(&yaml).expect("parse");

    assert_eq!(parsed.fusion_id, Some("fusion-1".to_string()));
    assert!(parsed.views["tree"].allow_concurrent_push);
    assert_eq!(parsed.views["tree"].tombstone_ttl_seconds, 3600);
}

#[test]
fn pipe_config_defaults_match_spec_values() {
    let yaml = r#"
source: s
sender: d
"#;
    let pipe: PipeConfig = serde_yaml::from_str(yaml).expect("parse");
    assert_eq!(pipe.backoff_multiplier, 2.0);
    assert_eq!(pipe.max_backoff_seconds, 300);
    assert_eq!(pipe.max_consecutive_errors, 5);
    assert_eq!(pipe.error_retry_interval, 1);
}
