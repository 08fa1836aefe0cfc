// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The value type stored under configuration keys.
//!
//! Entities hold an arbitrary key→value mapping (spec §3). A value is a
//! scalar, an ordered sequence, an ordered mapping, or an opaque code blob
//! (a step body reference, never interpreted by the config model itself).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A configuration value. Mirrors the four shapes `spec.md` §3 allows for
/// entity fields: scalars, ordered sequences, ordered mappings, and opaque
/// code values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Int(i64),
    Bool(bool),
    List(Vec<Value>),
    Hash(IndexMap<String, Value>),
    /// Opaque code reference (e.g. a callable queued via `queue_code`).
    /// Never merged or flattened; compared by identity token only.
    Code(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_hash(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Hash(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// True for list/hash shapes, which merge across ancestors rather than
    /// taking "first match wins" (spec §4.3).
    pub fn is_collection(&self) -> bool {
        matches!(self, Value::List(_) | Value::Hash(_))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// Concatenate sequences and scalars into a single flat sequence, one level
/// deep (spec §4.3 `flatten_list`).
pub fn flatten_list<'a>(values: impl IntoIterator<Item = &'a Value>) -> Vec<Value> {
    let mut out = Vec::new();
    for v in values {
        match v {
            Value::List(items) => out.extend(items.iter().cloned()),
            other => out.push(other.clone()),
        }
    }
    out
}

/// Left-to-right deep merge of mappings (spec §4.3 `flatten_hash`):
/// - both sides sequences → concatenate and deduplicate
/// - both sides mappings → recurse
/// - only one side defined → take it
/// - both scalars → later wins
pub fn flatten_hash<'a>(
    maps: impl IntoIterator<Item = &'a IndexMap<String, Value>>,
) -> IndexMap<String, Value> {
    let mut acc: IndexMap<String, Value> = IndexMap::new();
    for map in maps {
        for (k, v) in map {
            acc.entry(k.clone())
                .and_modify(|existing| *existing = merge_value(existing, v))
                .or_insert_with(|| v.clone());
        }
    }
    acc
}

fn merge_value(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::List(x), Value::List(y)) => {
            let mut merged = x.clone();
            for item in y {
                if !merged.contains(item) {
                    merged.push(item.clone());
                }
            }
            Value::List(merged)
        }
        (Value::Hash(x), Value::Hash(y)) => Value::Hash(flatten_hash([x, y])),
        // Scalar vs scalar (or mismatched shapes): later wins, per spec.
        (_, later) => later.clone(),
    }
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
