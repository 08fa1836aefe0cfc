// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration entities: named `device`/`class` nodes with a parent
//! (`ISA`) set, forming the multi-inheritance graph `spec.md` §3 describes.

use crate::error::AgentError;
use crate::value::Value;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

#[allow(clippy::expect_used)]
static DEVICE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][\w-]+$").expect("constant regex pattern is valid"));
#[allow(clippy::expect_used)]
static CLASS_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][\w-]+$").expect("constant regex pattern is valid"));

/// Whether an entity is a host (`device`) or a reusable fragment (`class`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Device,
    Class,
}

/// A single named node in the configuration forest.
#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    pub kind: EntityKind,
    /// Unordered parent set (`ISA`). Stored as a `Vec` because spec leaves
    /// enumeration order unspecified and insertion order is convenient for
    /// deterministic-per-traversal tie-breaking (§9 Open Questions).
    pub isa: Vec<String>,
    pub fields: IndexMap<String, Value>,
}

impl Entity {
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            kind,
            isa: Vec::new(),
            fields: IndexMap::new(),
        }
    }

    pub fn validate_name(name: &str, kind: EntityKind) -> Result<(), AgentError> {
        let ok = match kind {
            EntityKind::Device => DEVICE_NAME_RE.is_match(name),
            EntityKind::Class => CLASS_NAME_RE.is_match(name),
        };
        if ok {
            Ok(())
        } else {
            Err(AgentError::Config(format!(
                "invalid {} name: {name:?}",
                match kind {
                    EntityKind::Device => "device",
                    EntityKind::Class => "class",
                }
            )))
        }
    }
}

/// The in-memory set of all entities known to the agent, built once at
/// configuration-evaluation time and never mutated by steps (spec §3
/// Lifecycle).
#[derive(Debug, Default)]
pub struct EntityTable {
    entities: HashMap<String, Entity>,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a `device`/`class`. Duplicate definition of a name is a
    /// configuration error (spec §3).
    pub fn define(
        &mut self,
        name: impl Into<String>,
        kind: EntityKind,
        fields: IndexMap<String, Value>,
    ) -> Result<(), AgentError> {
        let name = name.into();
        Entity::validate_name(&name, kind)?;
        if self.entities.contains_key(&name) {
            return Err(AgentError::Config(format!(
                "duplicate entity definition: {name:?}"
            )));
        }
        let isa = match fields.get("ISA") {
            Some(Value::List(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(s)) => vec![s.clone()],
            _ => Vec::new(),
        };
        let mut entity = Entity::new(name.clone(), kind);
        entity.isa = isa;
        entity.fields = fields;
        self.entities.insert(name, entity);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
#[path = "entity_tests.rs"]
mod tests;
