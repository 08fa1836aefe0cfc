// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[test]
fn write_atomic_creates_destination() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("step.txt");
    write_atomic(&dest, b"hello").unwrap();
    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "hello");
}

#[test]
fn write_atomic_leaves_no_temp_file() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("step.txt");
    write_atomic(&dest, b"hello").unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name() != "step.txt")
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn write_atomic_refuses_empty_over_nonempty() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("step.txt");
    std::fs::write(&dest, b"existing content").unwrap();

    let err = write_atomic(&dest, b"").unwrap_err();
    assert!(matches!(err, AgentError::Http(_)));
    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "existing content");
}

#[test]
fn write_atomic_allows_empty_over_missing_destination() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("step.txt");
    write_atomic(&dest, b"").unwrap();
    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "");
}

#[test]
fn write_atomic_preserves_destination_extension_in_final_result() {
    // Regression: the temp name must be `<dest>.<pid>`, appended to the
    // full filename, not `with_extension` replacing an existing suffix
    // (which would turn "archive.tar.gz" into "archive.tar.<pid>").
    let dir = tempdir().unwrap();
    let dest = dir.path().join("archive.tar.gz");
    write_atomic(&dest, b"payload").unwrap();
    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "payload");
    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["archive.tar.gz".to_string()]);
}
