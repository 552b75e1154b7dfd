mod common;

use common::{article_model, tree};
use fieldkit_fields::{FieldData, FieldKind, NumberValue};
use fieldkit_model::Model;
use fieldkit_types::{KeyPath, ValuePath, ValuePathSegment};
use pretty_assertions::assert_eq;
use serde_json::json;

fn path(s: &str) -> KeyPath {
    s.parse().unwrap()
}

fn document_model() -> Model {
    Model::structure([
        ("title", Model::String),
        (
            "content",
            Model::union([
                ("text", Model::String),
                ("items", Model::list(Model::String)),
            ]),
        ),
        ("pair", Model::tuple([Model::Int32, Model::Bool])),
        ("note", Model::optional(Model::String)),
        ("labels", Model::map(Model::String)),
    ])
}

fn document_raw() -> serde_json::Value {
    json!({
        "title": "Doc",
        "content": { "items": ["a", "b", "c"] },
        "pair": [7, true],
        "note": null,
        "labels": { "en": "Hello", "de": "Hallo" },
    })
}

// ── Traverse ─────────────────────────────────────────────────────

#[test]
fn traverse_descends_through_containers() {
    let tree = tree(&document_model());
    let root = tree.root();

    assert_eq!(root.traverse(&KeyPath::root()), Some(root));
    assert_eq!(root.traverse(&path("title")).map(|f| f.kind()), Some(FieldKind::String));
    assert_eq!(root.traverse(&path("content/items/5")).map(|f| f.kind()), Some(FieldKind::String));
    assert_eq!(root.traverse(&path("pair/1")).map(|f| f.kind()), Some(FieldKind::Bool));
    assert_eq!(root.traverse(&path("note")).map(|f| f.kind()), Some(FieldKind::Optional));
    assert_eq!(root.traverse(&path("labels/anything")).map(|f| f.kind()), Some(FieldKind::String));
}

#[test]
fn traverse_unknown_segments() {
    let tree = tree(&document_model());
    let root = tree.root();

    assert_eq!(root.traverse(&path("missing")), None);
    assert_eq!(root.traverse(&path("title/deeper")), None);
    assert_eq!(root.traverse(&path("pair/2")), None);
    assert_eq!(root.traverse(&path("pair/first")), None);
    assert_eq!(root.traverse(&path("content/other")), None);
}

// ── Value paths ──────────────────────────────────────────────────

#[test]
fn value_paths_name_container_steps() {
    let tree = tree(&document_model());
    let root = tree.root();

    assert_eq!(root.value_path_for_key_path(&KeyPath::root()), ValuePath::root());
    assert_eq!(
        root.value_path_for_key_path(&path("content/items/0")),
        ValuePath::from(vec![
            ValuePathSegment::Struct { key: "content".to_string() },
            ValuePathSegment::Union { key: "items".to_string() },
            ValuePathSegment::List,
        ])
    );
    assert_eq!(root.value_path_for_key_path(&path("pair/0")).to_string(), "pair.0");
    assert_eq!(root.value_path_for_key_path(&path("labels/en")).to_string(), "labels.map[*]");
}

#[test]
fn optional_steps_do_not_consume_segments() {
    let tree = tree(&Model::structure([(
        "meta",
        Model::optional(Model::structure([("author", Model::String)])),
    )]));
    let root = tree.root();

    let value_path = root.value_path_for_key_path(&path("meta/author"));
    assert_eq!(value_path.to_string(), "meta.optional.author");
    assert!(!value_path.is_multi_valued());

    assert_eq!(root.value_path_for_key_path(&path("meta/nope")).to_string(), "meta");
}

#[test]
fn value_path_stops_at_unknown_segment() {
    let tree = tree(&document_model());
    let root = tree.root();

    assert_eq!(root.value_path_for_key_path(&path("missing/x")), ValuePath::root());
    assert_eq!(root.value_path_for_key_path(&path("title/x")).to_string(), "title");
    assert_eq!(root.value_path_for_key_path(&path("content/other")).to_string(), "content");
}

#[test]
fn numeric_member_names_are_addressable() {
    let tree = tree(&Model::structure([
        ("2024", Model::String),
        ("by", Model::union([("7", Model::Bool), ("x", Model::String)])),
    ]));
    let root = tree.root();

    assert_eq!(root.traverse(&path("2024")).map(|f| f.kind()), Some(FieldKind::String));
    assert_eq!(root.traverse(&path("by/7")).map(|f| f.kind()), Some(FieldKind::Bool));
    assert_eq!(
        root.value_path_for_key_path(&path("2024")),
        ValuePath::from(vec![ValuePathSegment::Struct { key: "2024".to_string() }])
    );
    assert_eq!(root.value_path_for_key_path(&path("by/7")).to_string(), "by.union[7]");

    let value = root.transform_raw_value(&json!({ "2024": "leap", "by": { "7": true } }));
    assert!(value.is_valid);
    assert_eq!(
        root.values_for_key_path(&value, &path("2024"))
            .first()
            .map(|v| &v.value),
        Some(&FieldData::String("leap".to_string()))
    );
    assert_eq!(
        root.values_for_key_path(&value, &path("by/7"))
            .first()
            .map(|v| &v.value),
        Some(&FieldData::Bool(true))
    );
}

#[test]
fn multi_valued_paths() {
    let tree = tree(&article_model());
    let root = tree.root();
    assert!(root.value_path_for_key_path(&path("tags/0")).is_multi_valued());
    assert!(!root.value_path_for_key_path(&path("title")).is_multi_valued());
}

// ── Values ───────────────────────────────────────────────────────

#[test]
fn values_fan_out_over_elements() {
    let tree = tree(&document_model());
    let root = tree.root();
    let value = root.transform_raw_value(&document_raw());
    assert!(value.is_valid, "{:?}", value.error);

    let items: Vec<&FieldData> = root
        .values_for_key_path(&value, &path("content/items/0"))
        .into_iter()
        .map(|v| &v.value)
        .collect();
    assert_eq!(
        items,
        vec![
            &FieldData::String("a".to_string()),
            &FieldData::String("b".to_string()),
            &FieldData::String("c".to_string()),
        ]
    );

    assert_eq!(root.values_for_key_path(&value, &path("labels/x")).len(), 2);
    assert_eq!(
        root.values_for_key_path(&value, &path("pair/0"))
            .first()
            .map(|v| &v.value),
        Some(&FieldData::Number(NumberValue::Int(7)))
    );
}

#[test]
fn values_skip_absent_and_unselected() {
    let tree = tree(&document_model());
    let root = tree.root();
    let value = root.transform_raw_value(&document_raw());

    assert!(root.values_for_key_path(&value, &path("content/text")).is_empty());
    assert!(root.values_for_key_path(&value, &path("note")).len() == 1);
    assert!(root.values_for_key_path(&value, &path("missing")).is_empty());
}

#[test]
fn optional_values_only_when_present() {
    let tree = tree(&Model::structure([(
        "meta",
        Model::optional(Model::structure([("author", Model::String)])),
    )]));
    let root = tree.root();

    let absent = root.transform_raw_value(&json!({ "meta": null }));
    assert!(root.values_for_key_path(&absent, &path("meta/author")).is_empty());

    let present = root.transform_raw_value(&json!({ "meta": { "author": "Ada" } }));
    let authors = root.values_for_key_path(&present, &path("meta/author"));
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].value, FieldData::String("Ada".to_string()));
}

// ── Agreement ────────────────────────────────────────────────────

#[test]
fn values_belong_to_the_traversed_field() {
    let tree = tree(&document_model());
    let root = tree.root();
    let value = root.transform_raw_value(&document_raw());

    for key_path in [
        "title",
        "content",
        "content/items",
        "content/items/0",
        "pair/0",
        "pair/1",
        "note",
        "labels",
        "labels/en",
    ] {
        let key_path = path(key_path);
        let field = root
            .traverse(&key_path)
            .unwrap_or_else(|| panic!("{key_path} does not traverse"));
        for found in root.values_for_key_path(&value, &key_path) {
            assert_eq!(
                &field.validated(found.value.clone()),
                found,
                "value at {key_path} does not belong to its field"
            );
        }
    }
}
