// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn error_messages_name_the_kind() {
    assert_eq!(AgentError::Http("boom".into()).to_string(), "HTTP error: boom");
    assert_eq!(
        AgentError::ConfigValidation {
            path: "host1/gems".into(),
            message: "expected list".into()
        }
        .to_string(),
        "config validation error at host1/gems: expected list"
    );
}

#[test]
fn control_signal_is_distinct_from_error() {
    let outcome = StepOutcome::Signal(ControlSignal::ValidationComplete);
    assert!(matches!(outcome, StepOutcome::Signal(ControlSignal::ValidationComplete)));
}
