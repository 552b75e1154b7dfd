mod common;

use common::{node_model, tree};
use fieldkit_fields::{Field, FieldKind, FieldTree, FieldRegistry};
use fieldkit_model::Model;
use fieldkit_types::{Expression, KeyPath};
use pretty_assertions::assert_eq;
use serde_json::json;

fn path(s: &str) -> KeyPath {
    s.parse().unwrap()
}

/// A singly linked list built with a recursion label.
fn chain_model() -> Model {
    Model::recursion(
        "chain",
        Model::structure([
            ("value", Model::Int32),
            ("next", Model::optional(Model::recurse("chain"))),
        ]),
    )
}

// ── Binding ──────────────────────────────────────────────────────

#[test]
fn recursive_group_behaves_as_top_member() {
    let tree = tree(&node_model());
    let root = tree.root();
    assert_eq!(root.kind(), FieldKind::Recursive);
    assert_eq!(root.effective().kind(), FieldKind::Struct);
}

#[test]
fn recurse_resolves_to_bound_member() {
    let tree = tree(&node_model());
    let root = tree.root();

    let element = root.traverse(&path("children/0")).unwrap();
    assert_eq!(element.kind(), FieldKind::Recurse);
    assert_eq!(element.resolved(), root.effective());
    assert_eq!(element.resolved().id(), root.effective().id());
}

#[test]
fn recursion_label_binds_its_child() {
    let tree = tree(&chain_model());
    let root = tree.root();
    assert_eq!(root.kind(), FieldKind::Recursion);

    let next = root.traverse(&path("next")).unwrap().inner().unwrap();
    assert_eq!(next.kind(), FieldKind::Recurse);
    assert_eq!(next.resolved(), root.effective());
}

#[test]
fn mutually_recursive_members_resolve_to_each_other() {
    let tree = tree(&Model::recursive(
        "a",
        [
            (
                "a",
                Model::structure([
                    ("name", Model::String),
                    ("b", Model::optional(Model::recurse("b"))),
                ]),
            ),
            (
                "b",
                Model::structure([
                    ("count", Model::Int32),
                    ("a", Model::optional(Model::recurse("a"))),
                ]),
            ),
        ],
    ));
    let root = tree.root();
    let Field::Recursive(group) = root.field() else {
        panic!("expected recursive group, got {:?}", root.kind());
    };
    let member = |label: &str| {
        group
            .members
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, id)| tree.get(*id))
            .unwrap()
    };

    let to_b = root.traverse(&path("b")).unwrap().inner().unwrap();
    assert_eq!(to_b.kind(), FieldKind::Recurse);
    assert_eq!(to_b.resolved().id(), member("b").id());
    assert_eq!(to_b.resolved(), member("b"));

    let to_a = to_b.traverse(&path("a")).unwrap().inner().unwrap();
    assert_eq!(to_a.resolved(), member("a"));
    assert_eq!(to_a.resolved(), root.effective());

    assert_eq!(
        root.traverse(&path("b/a/b/count")).map(|f| f.kind()),
        Some(FieldKind::Number)
    );
    assert!(root.default_value().is_valid);
}

#[test]
fn unbound_label_becomes_error_leaf() {
    let tree = tree(&Model::structure([("loop", Model::recurse("missing"))]));
    let child = tree.root().traverse(&path("loop")).unwrap();

    let Field::Error(error) = child.field() else {
        panic!("expected error leaf, got {:?}", child.kind());
    };
    assert_eq!(error.message, "recursion label \"missing\" is not bound");
    assert!(!tree.root().default_value().is_valid);
}

#[test]
fn recurse_outside_any_group_is_error() {
    let tree = tree(&Model::recurse("x"));
    assert_eq!(tree.root().kind(), FieldKind::Error);
}

// ── Traversal ────────────────────────────────────────────────────

#[test]
fn traversal_follows_recursion() {
    let tree = tree(&node_model());
    let root = tree.root();

    let deep = root.traverse(&path("children/0/children/3/label")).unwrap();
    assert_eq!(Some(deep), root.traverse(&path("label")));
    assert_eq!(deep.label(), Some("Label"));

    let chain = common::tree(&chain_model());
    let chain_root = chain.root();
    assert_eq!(
        chain_root.traverse(&path("next/next/value")),
        chain_root.traverse(&path("value"))
    );
}

// ── Values ───────────────────────────────────────────────────────

#[test]
fn recursive_default_terminates() {
    let tree = tree(&node_model());
    let value = tree.root().default_value();
    assert!(value.is_valid);
    assert_eq!(
        tree.root().transform_value_to_expression(&value).unwrap(),
        Expression::Struct(vec![
            ("label".to_string(), Expression::String(String::new())),
            ("children".to_string(), Expression::List(Vec::new())),
        ])
    );
}

#[test]
fn nested_values_roundtrip() {
    let tree = tree(&node_model());
    let root = tree.root();

    let raw = json!({
        "label": "root",
        "children": [
            { "label": "leaf", "children": [] },
        ],
    });
    let value = root.transform_raw_value(&raw);
    assert!(value.is_valid, "{:?}", value.error);
    assert_eq!(root.transform_value_to_expression(&value).unwrap().to_raw(), raw);

    let labels: Vec<_> = root
        .values_for_key_path(&value, &path("children/0/label"))
        .into_iter()
        .map(|v| v.value.clone())
        .collect();
    assert_eq!(labels.len(), 1);
}

#[test]
fn invalid_nested_value_invalidates_ancestors() {
    let tree = tree(&chain_model());
    let value = tree
        .root()
        .transform_raw_value(&json!({ "value": 1, "next": { "value": "two", "next": null } }));
    assert!(!value.is_valid);
    assert_eq!(value.error.as_deref(), Some("invalid fields: next"));
}

// ── Configuration ────────────────────────────────────────────────

#[test]
fn recursive_configurations_are_finite() {
    let tree = tree(&node_model());
    let root = tree.root();

    let filters: Vec<&str> = root
        .filter_configurations()
        .iter()
        .map(|f| f.id.as_str())
        .collect();
    assert_eq!(filters, vec!["label.string"]);

    let sorts: Vec<&str> = root
        .sort_configurations()
        .iter()
        .map(|s| s.key.as_str())
        .collect();
    assert_eq!(sorts, vec!["label.string"]);
}

#[test]
fn recursive_options_rebuild_the_same_tree() {
    let model = node_model();
    let tree = tree(&model);
    let options = tree.root().options();

    let rebuilt = FieldTree::from_model(&model, Some(&options), &FieldRegistry::default());
    assert_eq!(rebuilt.len(), tree.len());
    assert_eq!(rebuilt.root().options(), options);
}
