// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exception taxonomy (spec §7): a closed sum type of error kinds plus a
//! separate control-signal enum for non-error short-circuits
//! (`ValidationComplete`, `StepHelp`). Splitting the two means the driver's
//! per-step dispatch can pattern-match exhaustively instead of relying on
//! `isa`-based dynamic exception catching.

use thiserror::Error;

/// Error kinds propagated across components. Each variant is the kind
/// closest to the failure cause, per spec §7's propagation policy.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Transport or non-2xx HTTP failure (spec §4.1).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Filesystem I/O failure: open/write/rename (spec §3 atomic writes).
    #[error("local file error: {0}")]
    LocalFile(String),

    /// Schema/shape violation detected at step load or validation time
    /// (spec §4.4).
    #[error("config error: {0}")]
    Config(String),

    /// Validator-produced violation, accumulated in `--validate` mode.
    #[error("config validation error at {path}: {message}")]
    ConfigValidation { path: String, message: String },

    /// A step explicitly rejected the current safe-mode state.
    #[error("safe mode error: {0}")]
    SafeMode(String),
}

impl AgentError {
    /// Whether this variant counts toward the process's accumulated error
    /// count (spec §7, exit code = number of recoverable errors).
    pub fn counts_as_error(&self) -> bool {
        true
    }
}

/// Non-error control signals that short-circuit a step's body without
/// representing failure (spec §7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlSignal {
    /// Raised by `validate_config` under `--validate`: the schema has been
    /// registered for the current step and the rest of the step body
    /// should not run.
    ValidationComplete,
    /// Raised when `--step_help` matches the current step: render
    /// documentation instead of executing.
    StepHelp,
}

/// What a step invocation produced: an error, a control signal, or nothing
/// (ran to completion).
#[derive(Debug)]
pub enum StepOutcome {
    Ok,
    Signal(ControlSignal),
    Err(AgentError),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
