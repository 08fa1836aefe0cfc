// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step Loader (spec §4.5): given a step filename, returns its cached
//! source, fetching `steps/<filename>` on a miss. Steps here are compiled
//! into the binary (Design Notes approach (b) — this implementation does
//! not embed a scripting interpreter), so what is fetched over HTTP is
//! each step's *declaration* (name, numeric prefix, schema, doc header);
//! the body a step actually runs is the matching `Step` trait object
//! selected by filename, kept in a `StepRegistry`.

use crate::engine::{shortname_of, Engine};
use agent_core::{AgentError, ControlSignal, StepOutcome};
use agent_http::HttpClient;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// File extension shared-library modules are served under (spec §4.5:
/// `remote_require` fetches `<module>.<ext>`). The repository's module
/// format is opaque to this crate; any stable suffix works.
const MODULE_EXT: &str = "module";

/// A structured POD-style doc header (spec §6: "steps include a
/// structured POD-style header (NAME, DESCRIPTION, OPTIONS, EXAMPLE,
/// COPYRIGHT) that `--step_help` extracts and renders to text").
#[derive(Debug, Clone, Copy)]
pub struct StepDoc {
    pub name: &'static str,
    pub description: &'static str,
    pub options: &'static [&'static str],
    pub example: &'static str,
    pub copyright: &'static str,
}

impl StepDoc {
    /// Renders the header to the plain text `--step_help` prints, in POD
    /// section order.
    pub fn render(&self) -> String {
        let mut out = format!("NAME\n    {}\n\nDESCRIPTION\n    {}\n", self.name, self.description);
        if !self.options.is_empty() {
            out.push_str("\nOPTIONS\n");
            for opt in self.options {
                out.push_str(&format!("    {opt}\n"));
            }
        }
        out.push_str(&format!("\nEXAMPLE\n    {}\n\nCOPYRIGHT\n    {}\n", self.example, self.copyright));
        out
    }
}

/// A compiled-in step body. Implementors are registered in a
/// `StepRegistry` under the filename they answer to.
pub trait Step: Send + Sync {
    /// Runs the step body against the shared engine context.
    fn run(&self, engine: &mut Engine) -> StepOutcome;

    /// The step's POD-style documentation header, if it carries one.
    /// Steps with no operator-facing behavior (e.g. internal bookkeeping)
    /// may leave this `None`.
    fn doc(&self) -> Option<StepDoc> {
        None
    }
}

/// Maps step filenames to their compiled bodies.
#[derive(Default)]
pub struct StepRegistry {
    steps: HashMap<String, Arc<dyn Step>>,
    /// Full index filenames in registration order, kept separately from
    /// `steps` (which also holds shortname aliases) so callers can
    /// enumerate each distinct step exactly once.
    filenames: Vec<String>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `step` under both its full index filename and its short
    /// name (the suffix after the numeric prefix), so `queue_step`'s
    /// shortname matching and the driver's full-filename dispatch both
    /// resolve to the same body.
    pub fn register(&mut self, filename: impl Into<String>, step: Arc<dyn Step>) {
        let filename = filename.into();
        let short = shortname_of(&filename).to_string();
        self.steps.insert(short, Arc::clone(&step));
        self.filenames.push(filename.clone());
        self.steps.insert(filename, step);
    }

    pub fn get(&self, filename: &str) -> Option<Arc<dyn Step>> {
        self.steps
            .get(filename)
            .or_else(|| self.steps.get(shortname_of(filename)))
            .cloned()
    }

    pub fn dispatch(&self, filename: &str, engine: &mut Engine) -> StepOutcome {
        match self.get(filename) {
            Some(step) => step.run(engine),
            None => StepOutcome::Err(AgentError::Config(format!("no compiled step for {filename}"))),
        }
    }

    /// Iterates each distinct registered step once, paired with its full
    /// index filename.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Step>)> {
        self.filenames.iter().map(move |filename| (filename.as_str(), &self.steps[filename]))
    }

    /// Steps whose full filename or short name matches `--step_help`'s
    /// `^\d*-?S$` pattern (spec §6), same matching rule `--skip_step` and
    /// `--only` use.
    pub fn matching(&self, pattern: &str) -> Vec<(&str, &Arc<dyn Step>)> {
        self.iter()
            .filter(|(filename, _)| filename == &pattern || shortname_of(filename) == pattern)
            .collect()
    }
}

/// Caches step/module *source bytes* fetched over HTTP. Immutable once
/// inserted (spec §3 Lifecycle); guarded by a mutex though the engine
/// itself runs single-threaded, matching the source workspace's habit of
/// guarding in-process caches even where a single caller currently exists.
pub struct StepLoader {
    client: HttpClient,
    base_url: String,
    cache: Mutex<HashMap<String, Vec<u8>>>,
    loaded_modules: Mutex<std::collections::HashSet<String>>,
}

impl StepLoader {
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            cache: Mutex::new(HashMap::new()),
            loaded_modules: Mutex::new(std::collections::HashSet::new()),
        }
    }

    fn url_for(&self, relative: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), relative.trim_start_matches('/'))
    }

    /// Fetches an absolute `url` without caching or joining against
    /// `base_url` — used for the directory index, which must always
    /// reflect the server's current listing rather than a remembered copy.
    pub fn fetch_raw(&self, url: &str) -> Result<Vec<u8>, AgentError> {
        self.client.fetch(url)
    }

    /// Fetches `steps/<filename>` on a cache miss; stored verbatim, no
    /// preprocessing (spec §4.5).
    pub fn load_step_source(&self, filename: &str) -> Result<Vec<u8>, AgentError> {
        if let Some(cached) = self.cache.lock().get(filename) {
            return Ok(cached.clone());
        }
        let bytes = self.client.fetch(&self.url_for(&format!("steps/{filename}")))?;
        self.cache.lock().insert(filename.to_string(), bytes.clone());
        Ok(bytes)
    }

    /// `remote_require(module, optional)` (spec §4.5): fetches
    /// `<module>.<ext>` once and remembers it as loaded. Optional modules
    /// that fail to load return `Ok(false)` rather than propagating the
    /// HTTP error.
    pub fn remote_require(&self, module: &str, optional: bool) -> Result<bool, AgentError> {
        if self.loaded_modules.lock().contains(module) {
            return Ok(true);
        }
        match self.client.fetch(&self.url_for(&format!("{module}.{MODULE_EXT}"))) {
            Ok(bytes) => {
                self.cache.lock().insert(module.to_string(), bytes);
                self.loaded_modules.lock().insert(module.to_string());
                Ok(true)
            }
            Err(err) if optional => {
                tracing::warn!(module, %err, "optional module failed to load");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}

/// Control-flow helper for `validate_config(schema)` under `--validate`
/// mode (spec §4.4/§4.6): registers the schema for the current step and
/// short-circuits the rest of the step body.
pub fn validate_config(
    engine: &mut Engine,
    schema: agent_config::Schema,
) -> Result<(), ControlSignal> {
    let step = engine
        .current_step
        .clone()
        .unwrap_or_else(|| "<unknown step>".to_string());
    let path = format!("{}/{}", engine.hostname, shortname_of(&step));
    let value = agent_config::lookup_one(&engine.config.entities, &path, None);
    let errors = agent_config::validate(&schema, value.as_ref(), &path);
    engine.validation_errors.extend(errors);
    if engine.validate_mode {
        Err(ControlSignal::ValidationComplete)
    } else {
        Ok(())
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
