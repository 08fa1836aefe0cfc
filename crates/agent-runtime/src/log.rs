// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logging primitives (spec §4.6): `l`/`v`/`w`/`d`/`fatal`, layered on
//! `tracing` for the ambient structured-logging stack, plus the in-memory
//! run log every logged line is also appended to, and the lazy
//! once-per-step label header.

use crate::engine::Engine;
use std::sync::atomic::Ordering;

/// Prints the current step's filename exactly once, the first time any of
/// `l`/`v`/`w`/`d` is called for that step (spec §4.6 "step label printed
/// lazily on first output").
fn print_step_label_if_needed(engine: &Engine) {
    if engine.no_step_labels {
        return;
    }
    if engine.step_label_printed.swap(true, Ordering::SeqCst) {
        return;
    }
    if let Some(step) = &engine.current_step {
        tracing::info!(step = %step, "step");
    }
}

fn record(engine: &mut Engine, line: String) {
    print_step_label_if_needed(engine);
    engine.run_log.push(line);
}

/// `l(msg)`: always-visible informational line.
pub fn l(engine: &mut Engine, msg: &str) {
    tracing::info!("{msg}");
    record(engine, msg.to_string());
}

/// `v(msg)`: verbose line, shown at verbosity >= 2.
pub fn v(engine: &mut Engine, msg: &str) {
    if engine.verbosity >= 2 {
        tracing::debug!("{msg}");
    }
    record(engine, msg.to_string());
}

/// `w(msg)`: warning, always shown regardless of verbosity.
pub fn w(engine: &mut Engine, msg: &str) {
    tracing::warn!("{msg}");
    record(engine, format!("WARNING: {msg}"));
}

/// `d(msg)`: debug line, shown only at verbosity >= 3.
pub fn d(engine: &mut Engine, msg: &str) {
    if engine.verbosity >= 3 {
        tracing::trace!("{msg}");
    }
    record(engine, format!("DEBUG: {msg}"));
}

/// `fatal(msg)`: logs at error level and returns the message for the caller
/// to wrap in an `AgentError` and abort the current step (spec §4.6: fatal
/// does not itself unwind the process — the driver decides what "abort"
/// means for the current dispatch).
pub fn fatal(engine: &mut Engine, msg: &str) -> String {
    tracing::error!("{msg}");
    record(engine, format!("FATAL: {msg}"));
    msg.to_string()
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
