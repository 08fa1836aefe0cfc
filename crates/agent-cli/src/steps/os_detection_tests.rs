// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parse_pretty_name_extracts_quoted_value() {
    let sample = "NAME=\"Test Linux\"\nPRETTY_NAME=\"Test Linux 9\"\nVERSION_ID=\"9\"\n";
    assert_eq!(parse_pretty_name(sample).as_deref(), Some("Test Linux 9"));
}

#[test]
fn parse_pretty_name_none_when_missing() {
    assert_eq!(parse_pretty_name("NAME=\"Test Linux\"\n"), None);
}

#[test]
fn os_detection_step_never_errors() {
    use agent_config::ConfigModel;
    use agent_core::AgentConfig;

    let mut engine = Engine::new(
        ConfigModel::new("host1"),
        AgentConfig::default(),
        "https://rollforward.example/agent".to_string(),
    );
    let outcome = OsDetection.run(&mut engine);
    assert!(matches!(outcome, StepOutcome::Ok));
    assert_eq!(engine.run_log.len(), 1);
}
