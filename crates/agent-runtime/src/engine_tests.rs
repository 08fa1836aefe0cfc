// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use agent_core::AgentConfig;
use agent_core::StepIndexEntry;

fn test_engine() -> Engine {
    Engine::new(
        ConfigModel::new("host1"),
        AgentConfig::default(),
        "https://rollforward.example/agent".to_string(),
    )
}

#[test]
fn shortname_of_strips_numeric_prefix() {
    assert_eq!(shortname_of("010-setup"), "setup");
    assert_eq!(shortname_of("setup"), "setup");
    assert_eq!(shortname_of("010-"), "");
}

#[test]
fn begin_step_resets_label_guard_and_forced_safe_mode() {
    let mut engine = test_engine();
    engine.step_forced_safe_mode = true;
    let prior_guard = Arc::clone(&engine.step_label_printed);
    prior_guard.store(true, Ordering::SeqCst);

    engine.begin_step("020-packages");

    assert_eq!(engine.current_step.as_deref(), Some("020-packages"));
    assert!(!engine.step_forced_safe_mode);
    assert!(!engine.step_label_printed.load(Ordering::SeqCst));
}

#[test]
fn dangerous_step_forces_safe_mode_unless_forced() {
    let mut engine = test_engine();
    engine.begin_step("030-reboot");
    engine.dangerous_step();
    assert!(engine.effective_safe_mode());

    engine.begin_step("030-reboot");
    engine.force.insert("030-reboot".to_string());
    engine.dangerous_step();
    assert!(!engine.effective_safe_mode());
}

#[test]
fn dangerous_step_force_matches_by_shortname_too() {
    let mut engine = test_engine();
    engine.begin_step("030-reboot");
    engine.force.insert("reboot".to_string());
    engine.dangerous_step();
    assert!(!engine.effective_safe_mode());
}

#[test]
fn find_step_by_shortname_matches_numeric_prefix() {
    let mut engine = test_engine();
    engine.index.push(StepIndexEntry::file("010-setup"));
    engine.index.push(StepIndexEntry::file("020-packages"));

    let found = engine.find_step_by_shortname("packages").expect("present");
    assert_eq!(found.filename, "020-packages");
    assert!(engine.find_step_by_shortname("missing").is_none());
}

#[test]
fn find_step_by_shortname_does_not_match_substring_tail() {
    let mut engine = test_engine();
    engine.index.push(StepIndexEntry::file("010-unpackages"));
    assert!(engine.find_step_by_shortname("packages").is_none());
}

#[test]
fn seed_queue_inserts_files_in_priority_order_skipping_dirs() {
    let mut engine = test_engine();
    engine.index.push(StepIndexEntry::file("020-packages"));
    let mut dir = StepIndexEntry::file("005-lib");
    dir.is_dir = true;
    engine.index.push(dir);
    engine.index.push(StepIndexEntry::file("010-setup"));

    engine.seed_queue();

    assert_eq!(engine.queue.len(), 2);
    let popped: Vec<_> = std::iter::from_fn(|| engine.queue.pop()).collect();
    assert_eq!(
        popped,
        vec![
            QueuePayload::Step("010-setup".to_string()),
            QueuePayload::Step("020-packages".to_string()),
        ]
    );
}

#[test]
fn next_deferred_id_is_monotonic_and_prefixed() {
    let mut engine = test_engine();
    let a = engine.next_deferred_id("defer");
    let b = engine.next_deferred_id("defer");
    assert_ne!(a, b);
    assert!(a.starts_with("defer-"));
}

#[test]
fn skip_key_candidates_include_short_and_full_name() {
    let candidates = skip_key_candidates("020-packages", "nginx");
    assert_eq!(candidates[0], "020-packages:nginx");
    assert_eq!(candidates[1], "packages:nginx");
}
