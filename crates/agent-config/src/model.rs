// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ConfigModel` is the definition surface: `device(name, block)`,
//! `class(name, block)`, `network(name, members)`, and `inherits(parents)`
//! sugar, evaluated once before any step runs (spec §3 Lifecycle, §4.3).

use crate::network::NetworkTable;
use agent_core::{AgentError, Entity, EntityKind, EntityTable, Value};
use indexmap::IndexMap;

/// The realized configuration: every defined entity plus named network
/// member lists. Read-only once built (spec §5: "Config model: read-only
/// after definition; concurrent-safe by construction").
#[derive(Debug, Default)]
pub struct ConfigModel {
    pub entities: EntityTable,
    pub networks: NetworkTable,
    /// The host root device's short name (domain stripped), spec §3.
    pub hostname: String,
}

impl ConfigModel {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            entities: EntityTable::new(),
            networks: NetworkTable::new(),
            hostname: hostname.into(),
        }
    }

    pub fn device(
        &mut self,
        name: impl Into<String>,
        block: IndexMap<String, Value>,
    ) -> Result<(), AgentError> {
        self.entities.define(name, EntityKind::Device, block)
    }

    pub fn class(
        &mut self,
        name: impl Into<String>,
        block: IndexMap<String, Value>,
    ) -> Result<(), AgentError> {
        self.entities.define(name, EntityKind::Class, block)
    }

    pub fn network(&mut self, name: impl Into<String>, members: Vec<String>) {
        self.networks.define(name, members);
    }

    /// `inherits(parents...)` sugar: produces the `ISA` field entry a
    /// `device`/`class` block should carry.
    pub fn inherits(parents: &[&str]) -> (String, Value) {
        (
            "ISA".to_string(),
            Value::List(parents.iter().map(|p| Value::from(*p)).collect()),
        )
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
