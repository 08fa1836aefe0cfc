// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-instance lock (spec §4.7 LOCKED, §6): an exclusive non-blocking
//! advisory flock on `/var/run/<agent>.lock`, held for the lifetime of the
//! process and released on drop.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

pub struct InstanceLock {
    path: PathBuf,
    // Held only to keep the flock alive; released when this is dropped.
    _file: File,
}

#[derive(Debug)]
pub struct AlreadyRunning;

impl InstanceLock {
    /// Opens (creating if needed) and exclusively, non-blockingly locks
    /// `path`. Truncation is deferred until after the lock is acquired, so
    /// a losing process never wipes the winner's lock file contents.
    pub fn acquire(path: &Path) -> Result<Result<Self, AlreadyRunning>, io::Error> {
        let file = OpenOptions::new().write(true).create(true).truncate(false).open(path)?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Ok(Self {
                path: path.to_path_buf(),
                _file: file,
            })),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(Err(AlreadyRunning)),
            Err(e) => Err(e),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
