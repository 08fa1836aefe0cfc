// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step identity and queue payloads (spec §3).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An entry from the remote step index (`GET <base_url>/steps/`).
///
/// `size`/`mtime`/`checksum` default to zero/empty for the non-native
/// listing formats (Apache/Nginx directory scrapes); `extra` preserves any
/// unrecognized header columns from the native "Rolloutd File Listing"
/// format verbatim, per the Open Question in spec §9.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepIndexEntry {
    pub filename: String,
    pub is_dir: bool,
    pub size: u64,
    pub mtime: String,
    pub checksum: String,
    pub extra: BTreeMap<String, String>,
}

impl StepIndexEntry {
    pub fn file(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            is_dir: false,
            size: 0,
            mtime: String::new(),
            checksum: String::new(),
            extra: BTreeMap::new(),
        }
    }

    /// Parses `NNN-name` into `(priority, shortname)`. Returns `None` for
    /// entries that don't match the numeric-prefix pattern (directories are
    /// filtered by the caller before this is relevant, but a malformed
    /// filename also yields `None`).
    pub fn priority_and_shortname(&self) -> Option<(i64, &str)> {
        let (prefix, rest) = self.filename.split_once('-')?;
        let priority: i64 = prefix.parse().ok()?;
        Some((priority, rest))
    }
}

/// Payload carried by a priority-queue entry: either a step filename or an
/// in-process deferred action. Deferred callables are identified by a
/// unique opaque token (spec §4.2: distinct payloads must never compare
/// equal via string representation by accident).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueuePayload {
    Step(String),
    Deferred(String),
}

impl QueuePayload {
    pub fn as_key(&self) -> &str {
        match self {
            QueuePayload::Step(s) => s,
            QueuePayload::Deferred(s) => s,
        }
    }

    pub fn is_step(&self) -> bool {
        matches!(self, QueuePayload::Step(_))
    }
}

impl std::fmt::Display for QueuePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueuePayload::Step(s) => write!(f, "step:{s}"),
            QueuePayload::Deferred(s) => write!(f, "deferred:{s}"),
        }
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
