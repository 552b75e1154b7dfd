mod common;

use common::{tree, tree_with};
use fieldkit_fields::{Field, FieldBuilder, FieldKind, FieldRegistry, FieldTree, MEDIA_ANNOTATION};
use fieldkit_model::{FieldOptions, Model};
use fieldkit_types::KeySegment;
use pretty_assertions::assert_eq;

fn media_model() -> Model {
    Model::annotation(
        MEDIA_ANNOTATION,
        Model::structure([("id", Model::String), ("url", Model::String)]),
    )
}

fn error_message(tree: &FieldTree) -> String {
    match tree.root().field() {
        Field::Error(error) => error.message.clone(),
        other => panic!("expected error leaf, got {:?}", other.kind()),
    }
}

// ── Type tags ────────────────────────────────────────────────────

#[test]
fn type_tags_roundtrip() {
    for kind in &FieldKind::ALL {
        assert_eq!(FieldKind::from_type_tag(kind.type_tag()), Some(*kind));
    }
    assert_eq!(FieldKind::DateTime.type_tag(), "dateTime");
    assert_eq!(FieldKind::from_type_tag("nope"), None);
}

#[test]
fn default_registry_contains_every_creatable_kind() {
    let registry = FieldRegistry::default();
    for kind in &FieldKind::ALL {
        if *kind != FieldKind::Error {
            assert!(registry.kinds().contains(kind), "{kind:?} is not registered");
        }
    }
}

// ── Inference ────────────────────────────────────────────────────

#[test]
fn infers_from_model_shape() {
    let cases = [
        (Model::String, FieldKind::String),
        (Model::Bool, FieldKind::Bool),
        (Model::Uint64, FieldKind::Number),
        (Model::DateTime, FieldKind::DateTime),
        (Model::Null, FieldKind::Null),
        (Model::enumeration(["a"]), FieldKind::Enum),
        (Model::reference("user"), FieldKind::Ref),
        (Model::tuple([Model::Bool]), FieldKind::Tuple),
        (Model::set(Model::Bool), FieldKind::Set),
        (Model::map(Model::Bool), FieldKind::Map),
    ];
    for (model, kind) in cases {
        assert_eq!(tree(&model).root().kind(), kind, "model {model:?}");
    }
}

#[test]
fn media_annotation_claims_struct() {
    assert_eq!(tree(&media_model()).root().kind(), FieldKind::Media);

    let plain = Model::structure([("id", Model::String)]);
    assert_eq!(tree(&plain).root().kind(), FieldKind::Struct);
}

#[test]
fn transparent_wrappers_are_unwrapped() {
    let model = Model::unique(Model::annotation("field:custom", Model::String));
    assert_eq!(tree(&model).root().kind(), FieldKind::String);
}

#[test]
fn registration_order_decides() {
    let mut registry = FieldRegistry::empty();
    registry.register(FieldKind::Struct).register(FieldKind::Media).register(FieldKind::String);

    let tree = FieldTree::from_model(&media_model(), None, &registry);
    assert_eq!(tree.root().kind(), FieldKind::Struct);

    registry.unregister(FieldKind::Struct);
    let tree = FieldTree::from_model(&media_model(), None, &registry);
    assert_eq!(tree.root().kind(), FieldKind::Media);
}

#[test]
fn register_keeps_existing_position() {
    let mut registry = FieldRegistry::empty();
    registry.register(FieldKind::Bool).register(FieldKind::String).register(FieldKind::Bool);
    assert_eq!(registry.kinds(), &[FieldKind::Bool, FieldKind::String]);
}

#[test]
fn ignored_types_fall_through_to_next_match() {
    let registry = FieldRegistry::default();

    let mut builder = FieldBuilder::new(&registry).with_ignored(["media"]);
    let root = builder.create_field(&media_model(), None);
    assert_eq!(builder.initialize(root).root().kind(), FieldKind::Struct);

    let mut builder = FieldBuilder::new(&registry);
    let root = builder.create_field_ignoring(&media_model(), None, &["media"]);
    assert_eq!(builder.initialize(root).root().kind(), FieldKind::Struct);
}

#[test]
fn ignoring_only_applies_to_inference() {
    let registry = FieldRegistry::default();
    let mut builder = FieldBuilder::new(&registry).with_ignored(["string"]);
    let root = builder.create_field(&Model::String, Some(&FieldOptions::of_type("string")));
    assert_eq!(builder.initialize(root).root().kind(), FieldKind::String);
}

#[test]
fn nothing_inferable_yields_error_leaf() {
    let tree = FieldTree::from_model(&Model::Bool, None, &FieldRegistry::empty());
    assert_eq!(
        error_message(&tree),
        "no field can be inferred from model of type \"bool\""
    );
}

// ── Explicit types ───────────────────────────────────────────────

#[test]
fn explicit_type_overrides_inference() {
    let tree = tree_with(&Model::String, &FieldOptions::of_type("password"));
    assert_eq!(tree.root().kind(), FieldKind::Password);
}

#[test]
fn explicit_type_on_wrong_model_names_both() {
    let tree = tree_with(&Model::String, &FieldOptions::of_type("bool"));
    assert_eq!(
        error_message(&tree),
        "expected model of type \"bool\", got \"string\""
    );
}

#[test]
fn unknown_type_tag() {
    let tree = tree_with(&Model::String, &FieldOptions::of_type("colorPicker"));
    assert_eq!(
        error_message(&tree),
        "no field registered for type \"colorPicker\""
    );
}

#[test]
fn unregistered_kind_cannot_be_requested() {
    let mut registry = FieldRegistry::default();
    registry.unregister(FieldKind::Password);
    let tree = FieldTree::from_model(
        &Model::String,
        Some(&FieldOptions::of_type("password")),
        &registry,
    );
    assert_eq!(tree.root().kind(), FieldKind::Error);
}

#[test]
fn error_leaves_do_not_poison_siblings() {
    let model = Model::structure([("ok", Model::String), ("broken", Model::String)]);
    let options = FieldOptions {
        fields: Some(vec![(KeySegment::from("broken"), FieldOptions::of_type("number"))]),
        ..FieldOptions::default()
    };
    let tree = tree_with(&model, &options);
    let root = tree.root();
    assert_eq!(root.kind(), FieldKind::Struct);

    let ok = root.traverse(&[KeySegment::from("ok")]).unwrap();
    let broken = root.traverse(&[KeySegment::from("broken")]).unwrap();
    assert_eq!(ok.kind(), FieldKind::String);
    assert_eq!(broken.kind(), FieldKind::Error);
}
