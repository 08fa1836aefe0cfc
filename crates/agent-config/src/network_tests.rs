// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn expands_ipv4_literals_as_themselves() {
    let mut t = NetworkTable::new();
    t.define("dmz", vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()]);
    assert_eq!(t.expand("dmz"), vec!["10.0.0.1", "10.0.0.2"]);
}

#[test]
fn expands_nested_network_references() {
    let mut t = NetworkTable::new();
    t.define("inner", vec!["10.0.0.1".to_string()]);
    t.define("outer", vec!["inner".to_string(), "10.0.0.2".to_string()]);
    assert_eq!(t.expand("outer"), vec!["10.0.0.1", "10.0.0.2"]);
}

#[test]
fn cyclic_network_references_terminate() {
    let mut t = NetworkTable::new();
    t.define("a", vec!["b".to_string()]);
    t.define("b", vec!["a".to_string()]);
    assert_eq!(t.expand("a"), Vec::<String>::new());
}

#[test]
fn unknown_network_returns_empty() {
    let t = NetworkTable::new();
    assert_eq!(t.expand("nope"), Vec::<String>::new());
}
