// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn device_lookup_returns_top_level_key() {
    let mut cfg = ConfigModel::new("host1");
    let mut block = IndexMap::new();
    block.insert("gems".to_string(), Value::List(vec!["a".into()]));
    cfg.device("host1", block).unwrap();

    let e = cfg.entity("host1").unwrap();
    assert_eq!(e.fields.get("gems").unwrap().as_list().unwrap().len(), 1);
}

#[test]
fn inherits_sugar_produces_isa_field() {
    let (key, value) = ConfigModel::inherits(&["Base", "Mid"]);
    assert_eq!(key, "ISA");
    assert_eq!(
        value,
        Value::List(vec![Value::from("Base"), Value::from("Mid")])
    );
}

#[test]
fn class_and_device_name_validation_is_enforced() {
    let mut cfg = ConfigModel::new("host1");
    let err = cfg.class("lowercase", IndexMap::new()).unwrap_err();
    assert!(matches!(err, AgentError::Config(_)));
}
