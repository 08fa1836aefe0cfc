// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path-style lookup (`c()`) and the generic inheritance walker `i_iterate`
//! every `i_*` predicate sits on top of (spec §4.3).
//!
//! Both `c()` and `i_iterate` share the same termination guarantee: a
//! per-call visited-set keyed by entity *name*, so any `ISA` graph —
//! DAG or cyclic — is walked at most once per entity (spec §8 invariant 2).

use agent_core::{Entity, EntityTable, Value};
use std::collections::HashSet;

/// One match produced by a traversal: which entity it was found on, and
/// the value found there.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub entity: String,
    pub value: Value,
}

fn split_path(path: &str) -> (&str, Vec<&str>) {
    let mut parts = path.split('/');
    let base = parts.next().unwrap_or("");
    (base, parts.collect())
}

/// Walks `chain` through nested `Hash` values starting at `fields`,
/// requiring every segment but the last to resolve to a mapping.
fn resolve_chain<'a>(
    fields: &'a indexmap::IndexMap<String, Value>,
    chain: &[&str],
) -> Option<&'a Value> {
    let (last, init) = chain.split_last()?;
    let mut current = fields;
    for segment in init {
        current = current.get(*segment)?.as_hash()?;
    }
    current.get(*last)
}

fn walk(entities: &EntityTable, entity_name: &str, chain: &[&str], visited: &mut HashSet<String>) -> Vec<Hit> {
    if !visited.insert(entity_name.to_string()) {
        return Vec::new();
    }
    let Some(entity) = entities.get(entity_name) else {
        return Vec::new();
    };
    let mut hits = Vec::new();
    if let Some(value) = resolve_chain(&entity.fields, chain) {
        hits.push(Hit {
            entity: entity_name.to_string(),
            value: value.clone(),
        });
    }
    for parent in &entity.isa {
        hits.extend(walk(entities, parent, chain, visited));
    }
    hits
}

/// Scalar-context `c(path, default)`: the first hit in visitation order
/// (child before parent), or `default`.
pub fn lookup_one(entities: &EntityTable, path: &str, default: Option<Value>) -> Option<Value> {
    lookup_all(entities, path).into_iter().next().or(default)
}

/// Sequence-context `c(path)`: every hit, in visitation order.
pub fn lookup_all(entities: &EntityTable, path: &str) -> Vec<Value> {
    let (base, chain) = split_path(path);
    let mut visited = HashSet::new();
    walk(entities, base, &chain, &mut visited)
        .into_iter()
        .map(|h| h.value)
        .collect()
}

/// The generic inheritance walker every `i_*` predicate is built on (spec
/// §4.3): visits `entity` and its ancestors, invoking `visit(entity_name,
/// value)` for every entity where `key` is defined as a direct (top-level)
/// field, guarded by a visited-set so cyclic `ISA` graphs still terminate.
pub fn i_iterate(entities: &EntityTable, key: &str, entity: &str, mut visit: impl FnMut(&str, &Value)) {
    let mut visited = HashSet::new();
    i_iterate_inner(entities, key, entity, &mut visited, &mut visit);
}

fn i_iterate_inner(
    entities: &EntityTable,
    key: &str,
    entity_name: &str,
    visited: &mut HashSet<String>,
    visit: &mut impl FnMut(&str, &Value),
) {
    if !visited.insert(entity_name.to_string()) {
        return;
    }
    let Some(entity) = entities.get(entity_name) else {
        return;
    };
    if let Some(value) = entity.fields.get(key) {
        visit(entity_name, value);
    }
    for parent in &entity.isa {
        i_iterate_inner(entities, key, parent, visited, visit);
    }
}

/// `i_has(class) -> first-match value`: most specific (first visitor to
/// return a defined value) wins.
pub fn i_has(entities: &EntityTable, key: &str, entity: &str) -> Option<Value> {
    let mut found = None;
    i_iterate(entities, key, entity, |_, value| {
        if found.is_none() {
            found = Some(value.clone());
        }
    });
    found
}

/// `i_isa(class, entity?) -> bool`: transitive `ISA` membership, including
/// the entity naming itself.
pub fn i_isa(entities: &EntityTable, class: &str, entity: &str) -> bool {
    if entity == class {
        return true;
    }
    let mut visited = HashSet::new();
    isa_walk(entities, class, entity, &mut visited)
}

fn isa_walk(entities: &EntityTable, class: &str, entity_name: &str, visited: &mut HashSet<String>) -> bool {
    if !visited.insert(entity_name.to_string()) {
        return false;
    }
    let Some(entity) = entities.get(entity_name) else {
        return false;
    };
    for parent in &entity.isa {
        if parent == class || isa_walk(entities, class, parent, visited) {
            return true;
        }
    }
    false
}

/// Membership check against a sequence-valued key (used by
/// `i_immutable_file`, `i_unsafe_file`, `i_unsafe_dir`): true if any
/// visited entity's list at `key` contains `item`.
pub fn i_member(entities: &EntityTable, key: &str, entity: &str, item: &str) -> bool {
    let mut found = false;
    i_iterate(entities, key, entity, |_, value| {
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

pub fn entity_exists(entities: &EntityTable, name: &str) -> bool {
    entities.contains(name)
}

pub fn root_entity(entities: &EntityTable, name: &str) -> Option<&Entity> {
    entities.get(name)
}

#[cfg(test)]
#[path = "lookup_tests.rs"]
mod tests;
