// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Memoization for the pure, hot-path lookups spec §4.3/§9 Design Notes
//! call out: "an implementation detail — required only where the config
//! model is hot (`i_has`, `i_isa`, `c`). Use a clear-on-config-change cache
//! keyed by argument tuple." The config model is read-only once built
//! (spec §5), so a `LookupCache` never needs invalidation during a run —
//! only a fresh one per `ConfigModel`.

use crate::lookup::{i_has, i_isa};
use agent_core::{EntityTable, Value};
use parking_lot::Mutex;
use std::collections::HashMap;

/// A per-run memoization cache for `i_has`/`i_isa`, keyed by the exact
/// argument tuple each was called with.
#[derive(Default)]
pub struct LookupCache {
    has: Mutex<HashMap<(String, String), Option<Value>>>,
    isa: Mutex<HashMap<(String, String), bool>>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized `i_has(key, entity)`.
    pub fn i_has(&self, entities: &EntityTable, key: &str, entity: &str) -> Option<Value> {
        let cache_key = (key.to_string(), entity.to_string());
        if let Some(hit) = self.has.lock().get(&cache_key) {
            return hit.clone();
        }
        let result = i_has(entities, key, entity);
        self.has.lock().insert(cache_key, result.clone());
        result
    }

    /// Memoized `i_isa(class, entity)`.
    pub fn i_isa(&self, entities: &EntityTable, class: &str, entity: &str) -> bool {
        let cache_key = (class.to_string(), entity.to_string());
        if let Some(hit) = self.isa.lock().get(&cache_key) {
            return *hit;
        }
        let result = i_isa(entities, class, entity);
        self.isa.lock().insert(cache_key, result);
        result
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
