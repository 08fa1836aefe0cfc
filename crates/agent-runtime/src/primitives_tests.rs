// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::engine::Engine;
use agent_config::ConfigModel;
use agent_core::{AgentConfig, EntityKind, QueuePayload, StepIndexEntry};
use indexmap::IndexMap;

fn engine_with(entities: Vec<(&str, EntityKind, IndexMap<String, Value>)>, hostname: &str) -> Engine {
    let mut config = ConfigModel::new(hostname);
    for (name, kind, fields) in entities {
        match kind {
            EntityKind::Device => config.device(name, fields).expect("valid device"),
            EntityKind::Class => config.class(name, fields).expect("valid class"),
        }
    }
    Engine::new(config, AgentConfig::default(), "https://rollforward.example/agent".to_string())
}

#[test]
fn c_returns_first_hit_or_default() {
    let mut fields = IndexMap::new();
    fields.insert("gems".to_string(), Value::from("rails"));
    let engine = engine_with(vec![("host1", EntityKind::Device, fields)], "host1");

    assert_eq!(c(&engine, "host1/gems", None), Some(Value::from("rails")));
    assert_eq!(c(&engine, "host1/missing", Some(Value::from("fallback"))), Some(Value::from("fallback")));
}

#[test]
fn i_should_false_when_skip_steps_lists_current_step_item() {
    let mut fields = IndexMap::new();
    fields.insert(
        "skip_steps".to_string(),
        Value::List(vec![Value::from("packages:nginx")]),
    );
    let mut engine = engine_with(vec![("host1", EntityKind::Device, fields)], "host1");
    engine.begin_step("020-packages");

    assert!(!i_should(&engine, "nginx"));
    assert!(i_should(&engine, "apache"));
}

#[test]
fn i_unsafe_file_checks_membership() {
    let mut fields = IndexMap::new();
    fields.insert(
        "unsafe_files".to_string(),
        Value::List(vec![Value::from("/etc/shadow")]),
    );
    let engine = engine_with(vec![("host1", EntityKind::Device, fields)], "host1");

    assert!(i_unsafe_file(&engine, "/etc/shadow"));
    assert!(!i_unsafe_file(&engine, "/etc/hosts"));
}

#[test]
fn command_in_safe_mode_logs_and_returns_zero_without_spawning() {
    let mut engine = engine_with(vec![], "host1");
    engine.safe_mode = true;
    engine.begin_step("030-reboot");

    let status = command(&mut engine, &["reboot".to_string()], CommandOptions::default()).expect("no-op success");
    assert!(status.success());
    assert!(engine.run_log.iter().any(|line| line.contains("CMD: reboot")));
}

#[test]
fn command_runs_for_real_outside_safe_mode() {
    let mut engine = engine_with(vec![], "host1");
    engine.begin_step("030-reboot");

    let status = command(&mut engine, &["true".to_string()], CommandOptions::default()).expect("runs");
    assert!(status.success());
}

#[test]
fn queue_step_inserts_matching_entry_at_priority_zero() {
    let mut engine = engine_with(vec![], "host1");
    engine.index.push(StepIndexEntry::file("050-nginx"));
    engine.queue.insert(QueuePayload::Step("100-other".to_string()), 100, None, None);

    queue_step(&mut engine, "nginx").expect("found");

    let popped = engine.queue.pop().expect("non-empty");
    assert_eq!(popped, QueuePayload::Step("050-nginx".to_string()));
}

#[test]
fn queue_step_errors_when_no_match() {
    let mut engine = engine_with(vec![], "host1");
    assert!(queue_step(&mut engine, "missing").is_err());
}

#[test]
fn queue_command_defers_at_requested_priority() {
    let mut engine = engine_with(vec![], "host1");
    let id = queue_command(&mut engine, vec!["echo".to_string(), "hi".to_string()], 998);
    assert_eq!(engine.queue.len(), 1);
    let popped = engine.queue.pop().expect("present");
    assert_eq!(popped, QueuePayload::Deferred(id));
}

#[test]
fn dangerous_step_helper_forces_safe_mode() {
    let mut engine = engine_with(vec![], "host1");
    engine.begin_step("030-reboot");
    dangerous_step(&mut engine);
    assert!(engine.effective_safe_mode());
}
