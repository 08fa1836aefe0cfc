// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The primitive library a step body calls against `&mut Engine` (spec
//! §4.6): config lookup (`c`), the `i_*` inheritance predicates,
//! `command()`, `http_file`, the queueing primitives, and `dangerous_step`.
//! Logging primitives (`l`/`v`/`w`/`d`/`fatal`) live in [`crate::log`].

use crate::command::{run_command, CommandOptions};
use crate::engine::{skip_key_candidates, DeferredAction, Engine};
use agent_core::{AgentError, QueuePayload, Value, WaitStatus};
use agent_http::HttpClient;
use std::path::Path;

/// `c(path, default?)` (spec §4.3), scalar context: the first hit in
/// visitation order, or `default`.
pub fn c(engine: &Engine, path: &str, default: Option<Value>) -> Option<Value> {
    agent_config::lookup_one(&engine.config.entities, path, default)
}

/// `c(path)` in sequence context: every hit, in visitation order.
pub fn c_all(engine: &Engine, path: &str) -> Vec<Value> {
    agent_config::lookup_all(&engine.config.entities, path)
}

/// `i_has(class) -> first-match value`. Memoized via `Engine::lookup_cache`
/// since the config model never changes once a run starts (spec §9 Design
/// Notes).
pub fn i_has(engine: &Engine, class: &str, entity: &str) -> Option<Value> {
    engine.lookup_cache.i_has(&engine.config.entities, class, entity)
}

/// `i_isa(class, entity?) -> bool`, defaulting `entity` to the host.
/// Memoized like `i_has`.
pub fn i_isa(engine: &Engine, class: &str, entity: Option<&str>) -> bool {
    engine
        .lookup_cache
        .i_isa(&engine.config.entities, class, entity.unwrap_or(&engine.hostname))
}

/// `i_should(item) -> bool`: false if `skip_steps` lists
/// `<step>:<item>` or `<shortstep>:<item>` anywhere in the host's
/// inheritance chain.
pub fn i_should(engine: &Engine, item: &str) -> bool {
    let Some(step) = &engine.current_step else {
        return true;
    };
    let candidates = skip_key_candidates(step, item);
    let mut skipped = false;
    agent_config::i_iterate(&engine.config.entities, "skip_steps", &engine.hostname, |_, value| {
        if skipped {
            return;
        }
        if let Some(items) = value.as_list() {
            if items
                .iter()
                .any(|v| v.as_str().is_some_and(|s| candidates.iter().any(|c| c == s)))
            {
                skipped = true;
            }
        }
    });
    !skipped
}

/// `i_immutable_file(path)`.
pub fn i_immutable_file(engine: &Engine, path: &str) -> bool {
    agent_config::lookup_all(&engine.config.entities, &format!("{}/immutable_files", engine.hostname))
        .iter()
        .any(|v| v.as_list().is_some_and(|items| items.iter().any(|i| i.as_str() == Some(path))))
}

/// `i_unsafe_file(path)`.
pub fn i_unsafe_file(engine: &Engine, path: &str) -> bool {
    member_of(engine, "unsafe_files", path)
}

/// `i_unsafe_dir(path)`.
pub fn i_unsafe_dir(engine: &Engine, path: &str) -> bool {
    member_of(engine, "unsafe_dirs", path)
}

fn member_of(engine: &Engine, key: &str, item: &str) -> bool {
    let mut found = false;
    agent_config::i_iterate(&engine.config.entities, key, &engine.hostname, |_, value| {
        if found {
            return;
        }
        if let Some(items) = value.as_list() {
            if items.iter().any(|v| v.as_str() == Some(item)) {
                found = true;
            }
        }
    });
    found
}

/// `i_ip(host?)`: the primary interface's IP from `interfaces`
/// configuration, defaulting to the host entity.
pub fn i_ip(engine: &Engine, host: Option<&str>) -> Option<String> {
    let entity = host.unwrap_or(&engine.hostname);
    let interfaces = c(engine, &format!("{entity}/interfaces"), None)?;
    let list = interfaces.as_list()?;
    let first = list.first()?;
    first
        .as_hash()
        .and_then(|m| m.get("ip"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// `command(argv, flags?)` (spec §4.6). In safe mode, logs `CMD: <argv>`
/// and returns success without spawning.
pub fn command(engine: &mut Engine, argv: &[String], options: CommandOptions) -> Result<WaitStatus, AgentError> {
    if engine.effective_safe_mode() {
        crate::log::l(engine, &format!("CMD: {}", argv.join(" ")));
        return Ok(WaitStatus::exited(0));
    }

    if let Some(intro) = &options.intro {
        crate::log::l(engine, intro);
    }

    let (status, _output) = run_command(argv, &options)?;

    match status.signal() {
        Some(sig) => {
            if let Some(failure) = &options.failure {
                crate::log::w(engine, &format!("{failure} (signal {sig})"));
            }
        }
        None if status.exit_code() != 0 => {
            if let Some(failure) = &options.failure {
                crate::log::w(engine, &format!("{failure} (exit {})", status.exit_code()));
            }
        }
        None => {
            if options.intro.is_none() {
                if let Some(success) = &options.success {
                    crate::log::l(engine, success);
                }
            }
        }
    }

    Ok(status)
}

/// `http_file(url, dest?)`: thin wrapper over the HTTP client, resolving
/// relative URLs against `base_url`.
pub fn http_file(engine: &Engine, client: &HttpClient, url: &str, dest: Option<&Path>) -> Result<Vec<u8>, AgentError> {
    let resolved = if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("{}/{}", engine.base_url.trim_end_matches('/'), url.trim_start_matches('/'))
    };
    match dest {
        Some(dest) => {
            client.fetch_to(&resolved, dest)?;
            Ok(Vec::new())
        }
        None => client.fetch(&resolved),
    }
}

/// `queue_step(shortname)` (spec §4.6): finds the matching index entry and
/// inserts it at priority 0, forcing it to run before any other queued
/// step.
pub fn queue_step(engine: &mut Engine, shortname: &str) -> Result<(), AgentError> {
    let filename = engine
        .find_step_by_shortname(shortname)
        .map(|e| e.filename.clone())
        .ok_or_else(|| AgentError::Config(format!("queue_step: no step matches {shortname:?}")))?;
    engine.queue.insert(QueuePayload::Step(filename), 0, None, None);
    Ok(())
}

/// `queue_command(argv, priority=998)`: defers a command until late in the
/// run. The command itself runs from the driver's drain loop via
/// `command()`, keyed by a synthetic deferred id.
pub fn queue_command(engine: &mut Engine, argv: Vec<String>, priority: i64) -> String {
    let id = engine.next_deferred_id("cmd");
    engine.deferred.insert(id.clone(), DeferredAction::Command(argv));
    engine.queue.insert(QueuePayload::Deferred(id.clone()), priority, None, None);
    id
}

/// `queue_code(callable, priority=998)`: defers an in-process callable
/// (represented here by its opaque registry key) until late in the run.
pub fn queue_code(engine: &mut Engine, callable_key: &str, priority: i64) -> String {
    let id = engine.next_deferred_id("code");
    engine.deferred.insert(id.clone(), DeferredAction::Code(callable_key.to_string()));
    engine.queue.insert(QueuePayload::Deferred(id.clone()), priority, None, None);
    id
}

/// `dangerous_step()` (spec §4.6).
pub fn dangerous_step(engine: &mut Engine) {
    engine.dangerous_step();
}

#[cfg(test)]
#[path = "primitives_tests.rs"]
mod tests;
