// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use agent_core::{flatten_list, EntityKind};
use indexmap::IndexMap;
use proptest::prelude::*;

fn table_from(defs: &[(&str, EntityKind, &[(&str, Value)], &[&str])]) -> EntityTable {
    let mut table = EntityTable::new();
    for (name, kind, fields, isa) in defs {
        let mut map = IndexMap::new();
        for (k, v) in *fields {
            map.insert(k.to_string(), v.clone());
        }
        if !isa.is_empty() {
            map.insert(
                "ISA".to_string(),
                Value::List(isa.iter().map(|p| Value::from(*p)).collect()),
            );
        }
        table.define(*name, *kind, map).unwrap();
    }
    table
}

#[test]
fn scenario_inheritance_lookup_flattens_child_before_parent() {
    // class Base => { gems => ["a","b"] }
    // class Mid => { ...inherits(Base), gems => ["c"] }
    // device host1 => { ...inherits(Mid) }
    let table = table_from(&[
        ("Base", EntityKind::Class, &[("gems", Value::List(vec!["a".into(), "b".into()]))], &[]),
        ("Mid", EntityKind::Class, &[("gems", Value::List(vec!["c".into()]))], &["Base"]),
        ("host1", EntityKind::Device, &[], &["Mid"]),
    ]);

    let hits = lookup_all(&table, "host1/gems");
    let flat = flatten_list(&hits);
    assert_eq!(flat, vec![Value::from("c"), Value::from("a"), Value::from("b")]);
}

#[test]
fn lookup_one_returns_default_when_no_hit() {
    let table = table_from(&[("host1", EntityKind::Device, &[], &[])]);
    let result = lookup_one(&table, "host1/missing", Some(Value::from("fallback")));
    assert_eq!(result, Some(Value::from("fallback")));
}

#[test]
fn lookup_nested_path_requires_mapping_chain() {
    let mut inner = IndexMap::new();
    inner.insert("port".to_string(), Value::from("8080"));
    let mut fields = IndexMap::new();
    fields.insert("server".to_string(), Value::Hash(inner));

    let mut table = EntityTable::new();
    table.define("host1", EntityKind::Device, fields).unwrap();

    let result = lookup_one(&table, "host1/server/port", None);
    assert_eq!(result, Some(Value::from("8080")));
}

#[test]
fn i_isa_is_transitive() {
    let table = table_from(&[
        ("Base", EntityKind::Class, &[], &[]),
        ("Mid", EntityKind::Class, &[], &["Base"]),
        ("host1", EntityKind::Device, &[], &["Mid"]),
    ]);
    assert!(i_isa(&table, "Base", "host1"));
    assert!(i_isa(&table, "Mid", "host1"));
    assert!(!i_isa(&table, "host1", "Base"));
}

#[test]
fn cyclic_isa_terminates_and_visits_each_entity_once() {
    // A isa B, B isa A: a pathological cycle at the data level.
    let table = table_from(&[
        ("A", EntityKind::Class, &[("marker", Value::from("a"))], &["B"]),
        ("B", EntityKind::Class, &[("marker", Value::from("b"))], &["A"]),
    ]);

    let mut visits = Vec::new();
    i_iterate(&table, "marker", "A", |name, _| visits.push(name.to_string()));
    assert_eq!(visits, vec!["A".to_string(), "B".to_string()]);
}

#[test]
fn i_has_prefers_most_specific() {
    let table = table_from(&[
        ("Base", EntityKind::Class, &[("flavor", Value::from("base"))], &[]),
        ("host1", EntityKind::Device, &[("flavor", Value::from("host"))], &["Base"]),
    ]);
    assert_eq!(i_has(&table, "flavor", "host1"), Some(Value::from("host")));
}

#[test]
fn i_member_checks_sequence_membership_across_ancestors() {
    let table = table_from(&[
        ("Base", EntityKind::Class, &[("skip_steps", Value::List(vec!["100-users:skip".into()]))], &[]),
        ("host1", EntityKind::Device, &[], &["Base"]),
    ]);
    assert!(i_member(&table, "skip_steps", "host1", "100-users:skip"));
    assert!(!i_member(&table, "skip_steps", "host1", "nope"));
}

proptest! {
    /// Invariant 2 (spec §8): for any inheritance graph (DAG or cyclic),
    /// i_iterate terminates and visits each reachable entity at most once.
    #[test]
    fn i_iterate_terminates_on_arbitrary_cyclic_graphs(
        edges in proptest::collection::vec((0usize..12, 0usize..12), 0..30)
    ) {
        let names: Vec<String> = (0..12).map(|i| format!("N{i}")).collect();
        let mut parents: Vec<Vec<usize>> = vec![Vec::new(); 12];
        for (from, to) in &edges {
            if from != to {
                parents[*from].push(*to);
            }
        }

        let mut table = EntityTable::new();
        for (i, name) in names.iter().enumerate() {
            let mut fields = IndexMap::new();
            fields.insert("present".to_string(), Value::from("yes"));
            fields.insert(
                "ISA".to_string(),
                Value::List(parents[i].iter().map(|p| Value::from(names[*p].as_str())).collect()),
            );
            table.define(name, EntityKind::Class, fields).unwrap();
        }

        let mut visits = Vec::new();
        i_iterate(&table, "present", "N0", |name, _| visits.push(name.to_string()));

        let unique: std::collections::HashSet<_> = visits.iter().collect();
        prop_assert_eq!(unique.len(), visits.len());
    }
}
