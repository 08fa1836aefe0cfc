// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn acquire_creates_and_locks_a_fresh_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("agent.lock");

    let lock = InstanceLock::acquire(&path).expect("no io error").expect("lock acquired");
    assert_eq!(lock.path(), path);
}

#[test]
fn second_acquire_reports_already_running() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("agent.lock");

    let _first = InstanceLock::acquire(&path).expect("no io error").expect("first lock");
    let second = InstanceLock::acquire(&path).expect("no io error");
    assert!(second.is_err());
}

#[test]
fn lock_is_released_on_drop() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("agent.lock");

    {
        let _lock = InstanceLock::acquire(&path).expect("no io error").expect("first lock");
    }

    let reacquired = InstanceLock::acquire(&path).expect("no io error");
    assert!(reacquired.is_ok());
}
