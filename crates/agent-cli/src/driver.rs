// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution Driver (spec §4.7): the process state machine from `LOCKED`
//! through `EXIT(errors)`. Each state is a private function; `run()` wires
//! them in sequence, matching the state diagram exactly.
//!
//! ```text
//! LOCKED → CONFIG_READ → INDEX_LOADED → SEED → RUN_SETUP
//!        → REORDER → DRAIN → CONFIG_WRITTEN → UNLOCKED → EXIT(errors)
//! ```

use crate::cli::Cli;
use crate::lock::InstanceLock;
use agent_config::ConfigModel;
use agent_core::{AgentConfig, AgentError, ControlSignal, QueuePayload, StepOutcome, Value};
use agent_http::{HttpClient, TlsConfig};
use agent_runtime::engine::shortname_of;
use agent_runtime::{Engine, StepLoader, StepRegistry};
use std::path::{Path, PathBuf};

pub const DEFAULT_LOCK_PATH: &str = "/var/run/rollforward.lock";
const AUTO_ONLY: &[&str] = &["setup", "os-detection", "modifiers", "complete"];

pub fn run(cli: &Cli, registry: &StepRegistry) -> Result<u32, AgentError> {
    // LOCKED
    let lock_path = PathBuf::from(DEFAULT_LOCK_PATH);
    let lock = InstanceLock::acquire(&lock_path)
        .map_err(|e| AgentError::LocalFile(format!("acquiring lock {}: {e}", lock_path.display())))?;
    let _lock = match lock {
        Ok(lock) => lock,
        Err(_already_running) => {
            return Err(AgentError::LocalFile(format!(
                "{} already running",
                lock_path.display()
            )))
        }
    };

    // CONFIG_READ
    let configdir = cli
        .configdir
        .clone()
        .unwrap_or_else(|| PathBuf::from("/etc/rollforward"));
    let configfile = resolve_configfile(&configdir, cli.configfile.as_deref());
    let mut agent_config = AgentConfig::load(&configfile)?;
    if let Some(url) = &cli.url {
        agent_config.set("base_url", url.clone());
    }
    let base_url = agent_config
        .base_url
        .clone()
        .ok_or_else(|| AgentError::Config("base_url is not configured".to_string()))?;

    let tls = TlsConfig {
        configdir: configdir.clone(),
        client_certificate: agent_config.client_certificate.clone(),
        client_certificate_key: agent_config.client_certificate_key.clone(),
        ca_certificate: agent_config.ca_certificate.clone(),
    };
    let client = HttpClient::new(&tls)?;

    let hostname = cli.hostname.clone().unwrap_or_else(default_hostname);
    let config_model = ConfigModel::new(hostname.clone());
    let mut engine = Engine::new(config_model, agent_config, base_url.clone());
    engine.verbosity = cli.verbosity();
    engine.safe_mode = cli.safe_mode || cli.validate;
    engine.validate_mode = cli.validate;
    engine.no_step_labels = cli.no_step_labels || cli.validate;
    engine.force = cli.force.iter().cloned().collect();
    engine.skip = cli.skip_step.iter().cloned().collect();
    // --only is only a restriction when the operator actually supplied
    // one; otherwise every step runs and AUTO_ONLY has nothing to add to.
    engine.only = if cli.only.is_empty() {
        Default::default()
    } else {
        cli.only.iter().cloned().chain(AUTO_ONLY.iter().map(|s| s.to_string())).collect()
    };

    let loader = StepLoader::new(client, base_url);

    // INDEX_LOADED
    let index_url = format!("{}/steps/", engine.base_url.trim_end_matches('/'));
    engine.index = loader_index(&loader, &index_url)?;

    // SEED
    engine.seed_queue();

    // RUN_SETUP
    if let Some(setup) = engine.queue.pop() {
        dispatch(&mut engine, registry, &setup);
    }

    // REORDER
    reorder(&mut engine);

    // DRAIN
    drain(&mut engine, registry);

    // Every accumulated schema violation counts toward the exit code
    // (spec §4.4/§7: "--validate... exit code = error count"); printed as
    // a structured (JSON) list so tooling can consume it, not just an
    // operator reading the terminal.
    accumulate_validation_errors(&mut engine);

    // CONFIG_WRITTEN
    engine.agent_config.write_atomically(&configfile)?;

    // UNLOCKED happens implicitly when `_lock` drops at the end of `run`.
    Ok(engine.error_count)
}

/// Folds `engine.validation_errors` into `engine.error_count` and prints
/// them, once, after the drain loop — a no-op when nothing was
/// accumulated (the common case outside `--validate` mode).
fn accumulate_validation_errors(engine: &mut Engine) {
    if engine.validation_errors.is_empty() {
        return;
    }
    report_validation_errors(&engine.validation_errors);
    engine.error_count += engine.validation_errors.len() as u32;
}

/// Renders `--validate` mode's accumulated schema violations as a JSON
/// array on stdout (spec §2 ambient stack: "serde/serde_json for... the
/// --validate mode's structured error list"). Falls back to one line per
/// error if serialization itself somehow fails.
fn report_validation_errors(errors: &[agent_config::ValidationError]) {
    match serde_json::to_string_pretty(errors) {
        Ok(json) => println!("{json}"),
        Err(_) => {
            for err in errors {
                println!("{}: {}", err.path, err.message);
            }
        }
    }
}

fn resolve_configfile(configdir: &Path, configfile: Option<&Path>) -> PathBuf {
    match configfile {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => configdir.join(path),
        None => configdir.join("agent.conf"),
    }
}

fn default_hostname() -> String {
    hostname_from_uname().unwrap_or_else(|| "localhost".to_string())
}

fn hostname_from_uname() -> Option<String> {
    let raw = std::fs::read_to_string("/proc/sys/kernel/hostname").ok()?;
    let full = raw.trim();
    full.split('.').next().map(str::to_string)
}

fn loader_index(loader: &StepLoader, url: &str) -> Result<Vec<agent_core::StepIndexEntry>, AgentError> {
    // StepLoader caches step *source*; the directory index itself is a
    // separate, uncached fetch since it must always reflect the server's
    // current listing.
    let body = loader.fetch_raw(url)?;
    let text = String::from_utf8_lossy(&body);
    agent_http::parse_index(&text)
}

fn dispatch(engine: &mut Engine, registry: &StepRegistry, payload: &QueuePayload) {
    match payload {
        QueuePayload::Step(filename) => dispatch_step(engine, registry, filename),
        QueuePayload::Deferred(id) => dispatch_deferred(engine, registry, id),
    }
}

fn dispatch_step(engine: &mut Engine, registry: &StepRegistry, filename: &str) {
    engine.begin_step(filename);
    report_outcome(engine, filename, registry.dispatch(filename, engine));
}

/// Runs whichever action `queue_command`/`queue_code` deferred under `id`
/// (spec §4.7 DRAIN: "if the entry is a callable, invoke it").
fn dispatch_deferred(engine: &mut Engine, registry: &StepRegistry, id: &str) {
    let Some(action) = engine.deferred.remove(id) else {
        tracing::warn!(id, "deferred entry popped with no recorded action");
        return;
    };
    match action {
        agent_runtime::engine::DeferredAction::Command(argv) => {
            if let Err(err) = agent_runtime::primitives::command(engine, &argv, Default::default()) {
                engine.record_error(&err);
                tracing::error!(%err, argv = ?argv, "deferred command failed");
            }
        }
        agent_runtime::engine::DeferredAction::Code(callable_key) => {
            report_outcome(engine, &callable_key, registry.dispatch(&callable_key, engine));
        }
    }
}

fn report_outcome(engine: &mut Engine, filename: &str, outcome: StepOutcome) {
    match outcome {
        StepOutcome::Ok => {}
        StepOutcome::Signal(ControlSignal::ValidationComplete) => {}
        StepOutcome::Signal(ControlSignal::StepHelp) => {}
        StepOutcome::Err(err) => {
            engine.record_error(&err);
            tracing::error!(step = %filename, %err, "step failed");
            // A fatal error does not abort the run (spec §5 Cancellation),
            // but the "complete" step is bumped to priority 0 so cleanup
            // still runs next rather than waiting behind whatever else is
            // still queued.
            if shortname_of(filename) != "complete" {
                requeue_complete(engine);
            }
        }
    }
}

/// Finds the still-queued `complete` step (if any) and moves it to
/// priority 0 (spec §5: "the driver... re-queues only the final remaining
/// step (the 'complete' step) at priority 0 so that cleanup hooks still
/// run").
fn requeue_complete(engine: &mut Engine) {
    let complete_filename = engine
        .queue
        .iter()
        .find_map(|entry| match entry {
            QueuePayload::Step(filename) if shortname_of(filename) == "complete" => {
                Some(filename.clone())
            }
            _ => None,
        });
    if let Some(filename) = complete_filename {
        engine.queue.update(QueuePayload::Step(filename), 0);
    }
}

fn reorder(engine: &mut Engine) {
    let path_reorder = format!("{}/rollout/reorder_steps", engine.hostname);
    for hit in agent_config::lookup_all(&engine.config.entities, &path_reorder) {
        for (step, priority) in pairs_of(&hit) {
            // spec §8 Boundary behaviors: reordering a step absent from the
            // remote index is a no-op, not an insertion of a new entry.
            if engine.find_step_by_shortname(&step).is_none() {
                continue;
            }
            engine.queue.update(QueuePayload::Step(step), priority);
        }
    }

    let path_copy = format!("{}/rollout/copy_steps", engine.hostname);
    for hit in agent_config::lookup_all(&engine.config.entities, &path_copy) {
        for (step, priority) in pairs_of(&hit) {
            if engine.find_step_by_shortname(&step).is_none() {
                continue;
            }
            engine.queue.insert(QueuePayload::Step(step), priority, None, None);
        }
    }
}

/// A `c()` hit at a `reorder_steps`/`copy_steps` path may itself be a
/// single flat `(step, priority)` pair (spec §8 scenario 5's
/// `["100-a", 300]`) or a list of such pairs. `pair_of` recognizes the
/// flat shape directly; anything else is walked one level for nested
/// pairs, so both shapes are accepted.
fn pairs_of(value: &Value) -> Vec<(String, i64)> {
    if let Some(pair) = pair_of(value) {
        return vec![pair];
    }
    value
        .as_list()
        .map(|items| items.iter().filter_map(pair_of).collect())
        .unwrap_or_default()
}

fn pair_of(value: &Value) -> Option<(String, i64)> {
    let items = value.as_list()?;
    let [step, priority] = items else { return None };
    let step = step.as_str()?.to_string();
    let priority = match priority {
        Value::Int(n) => *n,
        Value::String(s) => s.parse().ok()?,
        _ => return None,
    };
    Some((step, priority))
}

fn drain(engine: &mut Engine, registry: &StepRegistry) {
    while let Some(entry) = engine.queue.pop() {
        if let QueuePayload::Step(filename) = &entry {
            if should_skip(engine, filename) {
                continue;
            }
        }
        dispatch(engine, registry, &entry);
    }
}

/// `i_should("*")` (spec §4.3) reads `engine.current_step` to build its
/// `<step>:*`/`<shortstep>:*` `skip_steps` keys, so the candidate step must
/// be recorded as current *before* the check runs — not left over from
/// whichever step last dispatched. `dispatch_step`'s own `begin_step` call
/// re-sets this (and the label/dangerous-step guards) once the step is
/// actually run, so setting it here early is harmless on the non-skip path.
fn should_skip(engine: &mut Engine, filename: &str) -> bool {
    let short = shortname_of(filename);
    if engine.skip.contains(filename) || engine.skip.contains(short) {
        return true;
    }
    if !engine.only.is_empty() && !engine.only.contains(filename) && !engine.only.contains(short) {
        return true;
    }
    engine.current_step = Some(filename.to_string());
    !agent_runtime::primitives::i_should(engine, "*")
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
