// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution for `command()` (spec §4.6): runs argv with an
//! optional timeout, uid drop, and `run_as` user switch, returning the
//! POSIX-style `WaitStatus` the caller then tests with `.success()`.
//!
//! The source runtime's subprocess helper wraps `tokio::process::Command`
//! with `tokio::time::timeout` (see the adapter this crate is grounded on).
//! Since this engine runs single-threaded/blocking (spec §5), the timeout
//! here is implemented with a dedicated reader thread and
//! `std::sync::mpsc::recv_timeout` instead of pulling in an async runtime.

use agent_core::{AgentError, WaitStatus};
use std::io::Read;
use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Options accompanying a `command()` call (spec §4.6).
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Logged via `l()` before the command runs.
    pub intro: Option<String>,
    /// Logged via `l()` if the command exits zero.
    pub success: Option<String>,
    /// Logged via `w()` if the command exits non-zero or is signaled.
    pub failure: Option<String>,
    /// Kills the child and returns a timeout error if no output arrives
    /// for this long. `None` means no timeout.
    pub timeout: Option<Duration>,
    /// Drops privileges to this uid before exec, via
    /// `std::os::unix::process::CommandExt::uid` — no unsafe `pre_exec`
    /// needed.
    pub uid: Option<u32>,
    /// Re-execs under `sudo -u <run_as> -H` instead of exec'ing argv
    /// directly.
    pub run_as: Option<String>,
}

/// Runs `argv` (first element is the program) under `options`, returning
/// the combined stdout+stderr text and the wait status.
pub fn run_command(argv: &[String], options: &CommandOptions) -> Result<(WaitStatus, String), AgentError> {
    if argv.is_empty() {
        return Err(AgentError::Config("command(): empty argv".to_string()));
    }

    let (program, args): (&str, Vec<&str>) = if let Some(run_as) = &options.run_as {
        ("sudo", {
            let mut rewritten = vec!["-u", run_as.as_str(), "-H"];
            rewritten.extend(argv.iter().map(String::as_str));
            rewritten
        })
    } else {
        (argv[0].as_str(), argv[1..].iter().map(String::as_str).collect())
    };

    let mut cmd = Command::new(program);
    cmd.args(&args);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    // New process group rather than a detached session: true setsid()
    // needs an unsafe pre_exec hook, which the workspace forbids.
    cmd.process_group(0);
    if let Some(uid) = options.uid {
        cmd.uid(uid);
    }

    let mut child = cmd
        .spawn()
        .map_err(|e| AgentError::LocalFile(format!("spawning {program}: {e}")))?;

    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| AgentError::LocalFile(format!("{program}: missing piped stdout")))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| AgentError::LocalFile(format!("{program}: missing piped stderr")))?;

    let (tx, rx) = mpsc::channel();
    let out_tx = tx.clone();
    let stdout_thread = std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = stdout.read_to_end(&mut buf);
        let _ = out_tx.send(buf);
    });
    let stderr_thread = std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = stderr.read_to_end(&mut buf);
        let _ = tx.send(buf);
    });

    let deadline = options.timeout.map(|t| Instant::now() + t);
    let mut chunks = Vec::new();
    let mut timed_out = false;
    for _ in 0..2 {
        let remaining = match deadline {
            Some(d) => d.saturating_duration_since(Instant::now()),
            None => Duration::from_secs(u64::MAX / 2),
        };
        match rx.recv_timeout(remaining) {
            Ok(chunk) => chunks.push(chunk),
            Err(mpsc::RecvTimeoutError::Timeout) => {
                timed_out = true;
                break;
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    if timed_out {
        let _ = child.kill();
        let _ = child.wait();
        let _ = stdout_thread.join();
        let _ = stderr_thread.join();
        return Err(AgentError::LocalFile(format!(
            "command {program} timed out after {:?}",
            options.timeout.unwrap_or_default()
        )));
    }

    let _ = stdout_thread.join();
    let _ = stderr_thread.join();

    let status = child
        .wait()
        .map_err(|e| AgentError::LocalFile(format!("waiting on {program}: {e}")))?;

    let wait_status = match status.signal() {
        Some(sig) => WaitStatus::signaled(sig),
        None => WaitStatus::exited(status.code().unwrap_or(-1)),
    };

    let combined = chunks.concat();
    let output_text = String::from_utf8_lossy(&combined).into_owned();
    Ok((wait_status, output_text))
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
