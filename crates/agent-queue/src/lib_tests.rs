// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

fn step(name: &str) -> QueuePayload {
    QueuePayload::Step(name.to_string())
}

#[test]
fn pops_in_priority_order() {
    let mut q = PriorityQueue::new();
    q.insert(step("999-complete"), 999, None, None);
    q.insert(step("001-setup"), 1, None, None);
    q.insert(step("100-users"), 100, None, None);

    assert_eq!(q.pop(), Some(step("001-setup")));
    assert_eq!(q.pop(), Some(step("100-users")));
    assert_eq!(q.pop(), Some(step("999-complete")));
    assert_eq!(q.pop(), None);
}

#[test]
fn stable_fifo_within_equal_priority() {
    let mut q = PriorityQueue::new();
    q.insert(step("a"), 100, None, None);
    q.insert(step("b"), 100, None, None);
    q.insert(step("c"), 100, None, None);

    assert_eq!(q.pop(), Some(step("a")));
    assert_eq!(q.pop(), Some(step("b")));
    assert_eq!(q.pop(), Some(step("c")));
}

#[test]
fn delete_removes_by_payload() {
    let mut q = PriorityQueue::new();
    q.insert(step("a"), 1, None, None);
    q.insert(step("b"), 2, None, None);
    assert!(q.delete(&step("a")).is_some());
    assert_eq!(q.pop(), Some(step("b")));
    assert_eq!(q.len(), 0);
}

#[test]
fn delete_missing_payload_is_a_no_op() {
    let mut q = PriorityQueue::new();
    q.insert(step("a"), 1, None, None);
    assert_eq!(q.delete(&step("nonexistent")), None);
    assert_eq!(q.len(), 1);
}

#[test]
fn update_reprioritizes_step() {
    // index [001-setup, 100-a, 200-b, 999-complete]; reorder 100-a -> 300
    let mut q = PriorityQueue::new();
    q.insert(step("001-setup"), 1, None, None);
    q.insert(step("100-a"), 100, None, None);
    q.insert(step("200-b"), 200, None, None);
    q.insert(step("999-complete"), 999, None, None);

    q.update(step("100-a"), 300);

    let order: Vec<_> = q.iter().map(|p| p.as_key().to_string()).collect();
    assert_eq!(
        order,
        vec!["001-setup", "200-b", "100-a", "999-complete"]
    );
}

#[test]
fn queue_step_inserts_at_priority_zero_runs_next() {
    let mut q = PriorityQueue::new();
    q.insert(step("100-users"), 100, None, None);
    q.insert(step("200-git"), 200, None, None);

    // Simulates queue_step(s): insert at priority 0.
    q.insert(step("050-forced"), 0, None, None);

    assert_eq!(q.pop(), Some(step("050-forced")));
}

proptest! {
    #[test]
    fn popped_priorities_are_non_decreasing(
        priorities in proptest::collection::vec(-1000i64..1000, 0..50)
    ) {
        let mut q = PriorityQueue::new();
        let mut expected = std::collections::HashMap::new();
        for (i, p) in priorities.iter().enumerate() {
            let name = format!("item-{i}");
            expected.insert(name.clone(), *p);
            q.insert(step(&name), *p, None, None);
        }

        let mut last = i64::MIN;
        while let Some(payload) = q.pop() {
            let priority = expected[payload.as_key()];
            prop_assert!(priority >= last);
            last = priority;
        }
    }
}
