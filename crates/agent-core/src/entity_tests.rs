// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn fields(pairs: &[(&str, Value)]) -> IndexMap<String, Value> {
    pairs.iter().cloned().map(|(k, v)| (k.to_string(), v)).collect()
}

#[test]
fn device_and_class_name_regexes() {
    assert!(Entity::validate_name("host1", EntityKind::Device).is_ok());
    assert!(Entity::validate_name("Base", EntityKind::Class).is_ok());
    assert!(Entity::validate_name("Host1", EntityKind::Device).is_err());
    assert!(Entity::validate_name("base", EntityKind::Class).is_err());
}

#[test]
fn define_inserts_and_returns_top_level_key() {
    let mut table = EntityTable::new();
    table
        .define(
            "host1",
            EntityKind::Device,
            fields(&[("gems", Value::List(vec!["a".into()]))]),
        )
        .unwrap();
    let e = table.get("host1").unwrap();
    assert_eq!(e.fields.get("gems").unwrap().as_list().unwrap().len(), 1);
}

#[test]
fn duplicate_definition_is_an_error() {
    let mut table = EntityTable::new();
    table.define("host1", EntityKind::Device, IndexMap::new()).unwrap();
    let err = table
        .define("host1", EntityKind::Device, IndexMap::new())
        .unwrap_err();
    assert!(matches!(err, AgentError::Config(_)));
}

#[test]
fn isa_list_extracted_from_fields() {
    let mut table = EntityTable::new();
    table
        .define(
            "Mid",
            EntityKind::Class,
            fields(&[("ISA", Value::List(vec!["Base".into()]))]),
        )
        .unwrap();
    assert_eq!(table.get("Mid").unwrap().isa, vec!["Base".to_string()]);
}
