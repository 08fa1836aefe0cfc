// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_numeric_prefix_and_shortname() {
    let entry = StepIndexEntry::file("100-users");
    assert_eq!(entry.priority_and_shortname(), Some((100, "users")));
}

#[test]
fn malformed_filename_yields_none() {
    let entry = StepIndexEntry::file("subdir/");
    assert_eq!(entry.priority_and_shortname(), None);
    let entry = StepIndexEntry::file("no-prefix-here");
    // "no" doesn't parse as an integer.
    assert_eq!(entry.priority_and_shortname(), None);
}

#[test]
fn queue_payload_display_distinguishes_kinds() {
    let step = QueuePayload::Step("100-users".into());
    let deferred = QueuePayload::Deferred("cleanup-1".into());
    assert_ne!(step.to_string(), deferred.to_string());
    assert!(step.is_step());
    assert!(!deferred.is_step());
}
