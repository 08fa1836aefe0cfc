// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config validator (spec §4.4): checks a host's realized configuration
//! against a per-step schema literal. Schemas are recursive; validation
//! errors accumulate rather than short-circuiting on the first mismatch, so
//! `--validate` mode can report every violation in one pass.

use agent_core::Value;
use indexmap::IndexMap;

/// Recognized scalar/compound schema type tags (spec §4.4 `type` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaType {
    String,
    Path,
    Boolean,
    Code,
    List,
    Hash,
    Options,
}

impl SchemaType {
    fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (SchemaType::String | SchemaType::Path, Value::String(_)) => true,
            (SchemaType::Boolean, Value::Bool(_)) => true,
            (SchemaType::Code, Value::Code(_)) => true,
            (SchemaType::List, Value::List(_)) => true,
            (SchemaType::Hash | SchemaType::Options, Value::Hash(_)) => true,
            _ => false,
        }
    }
}

/// A schema node. `alternatives` holds one or more acceptable type tags
/// (spec allows `type` to be a bare tag or a sequence of alternatives, e.g.
/// `["code","string"]`).
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub alternatives: Vec<SchemaType>,
    pub required: bool,
    pub help: Option<String>,
    pub items: Option<Box<Schema>>,
    pub key: Option<Box<Schema>>,
    pub value: Option<Box<Schema>>,
    pub options: Option<IndexMap<String, Schema>>,
}

impl Schema {
    pub fn new(alternatives: impl IntoIterator<Item = SchemaType>) -> Self {
        Self {
            alternatives: alternatives.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_items(mut self, items: Schema) -> Self {
        self.items = Some(Box::new(items));
        self
    }

    pub fn with_options(mut self, options: IndexMap<String, Schema>) -> Self {
        self.options = Some(options);
        self
    }
}

/// One schema violation found by `validate` (spec §4.4). `Serialize`d as
/// part of `--validate` mode's structured error list (spec's own ambient
/// serialization stack — see `agent-cli::driver`).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

/// Validate `value` (absent if the key was never defined) against `schema`
/// at `path`, accumulating every violation found.
pub fn validate(schema: &Schema, value: Option<&Value>, path: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    validate_into(schema, value, path, &mut errors);
    errors
}

fn validate_into(schema: &Schema, value: Option<&Value>, path: &str, errors: &mut Vec<ValidationError>) {
    let Some(value) = value else {
        if schema.required {
            errors.push(ValidationError {
                path: path.to_string(),
                message: "required key is missing".to_string(),
            });
        }
        return;
    };

    if !schema.alternatives.is_empty() && !schema.alternatives.iter().any(|t| t.matches(value)) {
        errors.push(ValidationError {
            path: path.to_string(),
            message: format!("expected one of {:?}, got {value:?}", schema.alternatives),
        });
        return;
    }

    if let (Some(items_schema), Value::List(items)) = (&schema.items, value) {
        for (i, item) in items.iter().enumerate() {
            validate_into(items_schema, Some(item), &format!("{path}[{i}]"), errors);
        }
    }

    if let Some(options) = &schema.options {
        if let Value::Hash(map) = value {
            for (key, sub_value) in map {
                match options.get(key) {
                    Some(sub_schema) => {
                        validate_into(sub_schema, Some(sub_value), &format!("{path}.{key}"), errors);
                    }
                    None => errors.push(ValidationError {
                        path: format!("{path}.{key}"),
                        message: "unrecognized option key".to_string(),
                    }),
                }
            }
        }
    } else if let (Some(value_schema), Value::Hash(map)) = (&schema.value, value) {
        for (key, sub_value) in map {
            if let Some(key_schema) = &schema.key {
                validate_into(key_schema, Some(&Value::from(key.as_str())), &format!("{path}.{key}(key)"), errors);
            }
            validate_into(value_schema, Some(sub_value), &format!("{path}.{key}"), errors);
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
