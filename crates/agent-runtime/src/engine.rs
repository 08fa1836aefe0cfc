// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Engine`: the explicit context that replaces the source system's
//! process-wide mutable globals (`verbosity`, `safe_mode`, `current_step`,
//! `config`, the entity table, the queue) — spec §9 Design Notes. Step code
//! is handed primitive bindings that close over an `&mut Engine`; it never
//! touches global state directly.

use agent_config::{ConfigModel, LookupCache};
use agent_core::{AgentConfig, QueuePayload, StepIndexEntry};
use agent_queue::PriorityQueue;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What a deferred queue entry (`queue_command`/`queue_code`) actually
/// does once the drain loop reaches it (spec §4.6).
#[derive(Debug, Clone)]
pub enum DeferredAction {
    Command(Vec<String>),
    /// A compiled-in callable, identified by the registry key it shares
    /// with a `Step` (Design Notes approach (b) extends to deferred code:
    /// there is no embedded interpreter to hold an arbitrary closure).
    Code(String),
}

/// Verbosity level: 0 = quiet (errors only), 1 = normal, 2 = verbose,
/// 3 = debug (spec §6 `--verbose`/`--quiet`).
pub type Verbosity = u8;

/// Everything a primitive call needs, bundled into one value threaded
/// through the driver (spec §9).
pub struct Engine {
    pub config: ConfigModel,
    /// Memoizes `i_has`/`i_isa` (spec §4.3/§9 Design Notes): safe because
    /// `config` is never mutated once a run's steps start executing.
    pub lookup_cache: LookupCache,
    pub agent_config: AgentConfig,
    pub queue: PriorityQueue,
    pub index: Vec<StepIndexEntry>,

    pub verbosity: Verbosity,
    /// Global safe-mode flag (`--safe_mode`). A step may also set this
    /// locally via `dangerous_step()`; see `Engine::step_safe_mode`.
    pub safe_mode: bool,
    /// Per-step override set by `dangerous_step()`, cleared at the start
    /// of each step dispatch.
    pub step_forced_safe_mode: bool,
    pub validate_mode: bool,

    pub current_step: Option<String>,
    /// Lazily prints the step name once per step (spec §4.6 Logging).
    pub step_label_printed: Arc<AtomicBool>,
    pub no_step_labels: bool,

    /// `--force` set: steps allowed to run dangerous despite
    /// `dangerous_step()`.
    pub force: HashSet<String>,
    /// `--skip_step` set.
    pub skip: HashSet<String>,
    /// `--only` set (spec auto-adds setup/os-detection/modifiers/complete).
    pub only: HashSet<String>,

    /// Loaded shared-library modules, by name (spec §4.5 `remote_require`).
    pub loaded_modules: HashSet<String>,
    /// Registered `validate_config` schemas, by step filename, for
    /// `--validate` mode reporting.
    pub validation_errors: Vec<agent_config::ValidationError>,

    /// Accumulated run log (spec §4.6: "All logged text is also appended
    /// to an in-memory run log").
    pub run_log: Vec<String>,

    /// Count of recoverable errors encountered (spec §7: exit code).
    pub error_count: u32,

    pub base_url: String,
    pub hostname: String,

    /// Payloads behind `QueuePayload::Deferred(id)` entries, populated by
    /// `queue_command`/`queue_code` and consumed by the drain loop.
    pub deferred: HashMap<String, DeferredAction>,

    monotonic_deferred_id: u64,
}

impl Engine {
    pub fn new(config: ConfigModel, agent_config: AgentConfig, base_url: String) -> Self {
        let hostname = config.hostname.clone();
        Self {
            config,
            lookup_cache: LookupCache::new(),
            agent_config,
            queue: PriorityQueue::new(),
            index: Vec::new(),
            verbosity: 1,
            safe_mode: false,
            step_forced_safe_mode: false,
            validate_mode: false,
            current_step: None,
            step_label_printed: Arc::new(AtomicBool::new(false)),
            no_step_labels: false,
            force: HashSet::new(),
            skip: HashSet::new(),
            only: HashSet::new(),
            loaded_modules: HashSet::new(),
            validation_errors: Vec::new(),
            run_log: Vec::new(),
            error_count: 0,
            base_url,
            hostname,
            deferred: HashMap::new(),
            monotonic_deferred_id: 0,
        }
    }

    /// Effective safe-mode for the *current* step: the global flag OR the
    /// per-step override set by `dangerous_step()`.
    pub fn effective_safe_mode(&self) -> bool {
        self.safe_mode || self.step_forced_safe_mode
    }

    /// Called by the driver before dispatching a step: resets the
    /// per-step label guard and the `dangerous_step()` override.
    pub fn begin_step(&mut self, filename: &str) {
        self.current_step = Some(filename.to_string());
        self.step_label_printed = Arc::new(AtomicBool::new(false));
        self.step_forced_safe_mode = false;
    }

    /// `dangerous_step()` (spec §4.6): forces safe mode for the rest of the
    /// current step unless the step is in `--force`.
    pub fn dangerous_step(&mut self) {
        let Some(step) = &self.current_step else {
            return;
        };
        let shortname = shortname_of(step);
        if self.force.contains(step) || self.force.contains(shortname) {
            return;
        }
        self.step_forced_safe_mode = true;
    }

    pub fn record_error(&mut self, err: &agent_core::AgentError) {
        if err.counts_as_error() {
            self.error_count += 1;
        }
    }

    pub fn next_deferred_id(&mut self, prefix: &str) -> String {
        self.monotonic_deferred_id += 1;
        format!("{prefix}-{}", self.monotonic_deferred_id)
    }

    /// Finds a step matching `(\d+-)?<shortname>$` in the loaded index
    /// (spec §4.6 `queue_step`).
    pub fn find_step_by_shortname(&self, shortname: &str) -> Option<&StepIndexEntry> {
        let pattern = regex::Regex::new(&format!(r"^(?:\d+-)?{}$", regex::escape(shortname))).ok()?;
        self.index.iter().find(|e| !e.is_dir && pattern.is_match(&e.filename))
    }

    /// Seeds the queue from the loaded index (spec §4.7 SEED): entries
    /// matching `^(\d+)-(.*)` are inserted at their numeric prefix;
    /// directories are ignored.
    pub fn seed_queue(&mut self) {
        let entries: Vec<_> = self
            .index
            .iter()
            .filter(|e| !e.is_dir)
            .filter_map(|e| e.priority_and_shortname().map(|(p, _)| (e.filename.clone(), p)))
            .collect();
        for (filename, priority) in entries {
            self.queue.insert(QueuePayload::Step(filename), priority, None, None);
        }
    }
}

pub fn shortname_of(filename: &str) -> &str {
    match filename.split_once('-') {
        Some((prefix, rest)) if prefix.chars().all(|c| c.is_ascii_digit()) => rest,
        _ => filename,
    }
}

/// `i_should("<step>")`'s per-step/short-step skip_steps key matching (spec
/// §4.3): `<step>:<item>` or `<shortstep>:<item>`.
pub fn skip_key_candidates(current_step: &str, item: &str) -> [String; 2] {
    [
        format!("{current_step}:{item}"),
        format!("{}:{item}", shortname_of(current_step)),
    ]
}

#[derive(Debug, Default)]
pub struct LoadedModules(pub HashMap<String, Vec<u8>>);

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
