mod common;

use common::article_model;
use fieldkit_fields::mock::MockSession;
use fieldkit_fields::{EditorConfig, FieldData, FieldError, FieldKind, FieldRegistry, SessionContext, SortType, ViewContext};
use fieldkit_model::{FieldOptions, Model, Record, ViewContextOptions};
use fieldkit_types::{KeyPath, KeySegment};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn article_view() -> ViewContext {
    ViewContext::infer_from_model(
        "article",
        article_model(),
        &FieldRegistry::default(),
        &EditorConfig::default(),
    )
}

// ── Inference ────────────────────────────────────────────────────

#[test]
fn infers_name_slug_and_display_paths() {
    let view = article_view();
    assert_eq!(view.model_id, "article");
    assert_eq!(view.name, "Article");
    assert_eq!(view.slug, "article");
    assert_eq!(view.color, None);
    assert_eq!(
        view.display_key_paths,
        vec![KeyPath::from(vec![KeySegment::from("title")])]
    );
}

#[test]
fn multi_word_model_ids() {
    let view = ViewContext::infer_from_model(
        "blogPost",
        Model::structure([("count", Model::Int32)]),
        &FieldRegistry::default(),
        &EditorConfig::default(),
    );
    assert_eq!(view.name, "Blog Post");
    assert_eq!(view.slug, "blog-post");
    // No string member, nothing to display.
    assert!(view.display_key_paths.is_empty());
}

#[test]
fn record_timestamps_sort_first() {
    let view = article_view();
    let keys: Vec<&str> = view.sort_configurations().iter().map(|s| s.key.as_str()).collect();
    assert_eq!(
        keys,
        vec!["created", "updated", "title.string", "published.bool", "rating.number", "status.enum"]
    );
    assert_eq!(view.sort_configurations()[0].sort_type, SortType::Date);
    assert_eq!(view.filter_configurations(), view.field().filter_configurations());
}

// ── Options ──────────────────────────────────────────────────────

#[test]
fn explicit_options_win() {
    let options = ViewContextOptions {
        model: "article".to_string(),
        name: Some("Posts".to_string()),
        color: Some("#ff8800".to_string()),
        display_key_paths: Some(vec![KeyPath::from(vec![KeySegment::from("status")])]),
        ..ViewContextOptions::default()
    };
    let view = ViewContext::from_options(
        article_model(),
        &options,
        &FieldRegistry::default(),
        &EditorConfig::default(),
    );
    assert_eq!(view.name, "Posts");
    assert_eq!(view.slug, "posts");
    assert_eq!(view.color.as_deref(), Some("#ff8800"));
    assert_eq!(view.display_key_paths[0].to_string(), "status");
}

#[test]
fn options_roundtrip() {
    let view = article_view();
    let options = view.to_options();
    assert_eq!(options.field.as_ref().and_then(|f| f.field_type.as_deref()), Some("struct"));

    let rebuilt = ViewContext::from_options(
        article_model(),
        &options,
        &FieldRegistry::default(),
        &EditorConfig::default(),
    );
    assert_eq!(rebuilt.to_options(), options);
}

#[test]
fn options_survive_json() {
    let options = article_view().to_options();
    let json = serde_json::to_string(&options).unwrap();
    let parsed: ViewContextOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, options);
}

#[test]
fn ignored_field_types_apply_to_inference() {
    let config = EditorConfig {
        ignored_field_types: vec!["media".to_string()],
        ..EditorConfig::default()
    };
    let view = ViewContext::infer_from_model("article", article_model(), &FieldRegistry::default(), &config);
    let cover = view
        .field()
        .traverse(&[KeySegment::from("cover")])
        .and_then(|f| f.inner())
        .unwrap();
    assert_eq!(cover.kind(), FieldKind::Struct);

    let explicit = FieldOptions {
        fields: Some(vec![(
            KeySegment::from("cover"),
            FieldOptions {
                field: Some(Box::new(FieldOptions::of_type("media"))),
                ..FieldOptions::of_type("optional")
            },
        )]),
        ..FieldOptions::default()
    };
    let options = ViewContextOptions {
        model: "article".to_string(),
        field: Some(explicit),
        ..ViewContextOptions::default()
    };
    let view = ViewContext::from_options(article_model(), &options, &FieldRegistry::default(), &config);
    let cover = view
        .field()
        .traverse(&[KeySegment::from("cover")])
        .and_then(|f| f.inner())
        .unwrap();
    assert_eq!(cover.kind(), FieldKind::Media);
}

// ── Records ──────────────────────────────────────────────────────

#[test]
fn decodes_records_and_display_values() {
    let view = article_view();
    let record = Record {
        id: "a1".to_string(),
        model: "article".to_string(),
        created: 10,
        updated: 20,
        value: json!({
            "title": "Hello",
            "published": false,
            "rating": 5,
            "status": "review",
            "tags": [],
            "cover": null,
        }),
    };

    let value = view.decode_record(&record);
    assert!(value.is_valid, "{:?}", value.error);
    assert!(!value.has_changes);

    let display: Vec<&FieldData> = view.display_values(&value).into_iter().map(|v| &v.value).collect();
    assert_eq!(display, vec![&FieldData::String("Hello".to_string())]);
}

#[test]
fn session_resolves_registered_views() {
    let session = MockSession::new();
    session.register_view_context(Arc::new(article_view()));

    let view = session.view_context("article").unwrap();
    assert_eq!(view.slug, "article");
    assert!(session.view_context("user").is_none());
    assert!(tokio_test::block_on(session.get_record("article", "missing")).is_err());
}

// ── Editor config ────────────────────────────────────────────────

#[test]
fn editor_config_from_json() {
    let config = EditorConfig::from_json(r#"{ "title": "CMS", "mediaApiPath": "/api/media" }"#).unwrap();
    assert_eq!(config.title, "CMS");
    assert_eq!(config.base_path, "/");
    assert_eq!(config.media_api_path().unwrap(), "/api/media");
    assert!(config.ignored_field_types.is_empty());
}

#[test]
fn editor_config_validation() {
    assert!(matches!(
        EditorConfig::from_json(r#"{ "basePath": "admin" }"#),
        Err(FieldError::Config(_))
    ));
    assert!(matches!(
        EditorConfig::from_json("not json"),
        Err(FieldError::Serialization(_))
    ));
    assert!(matches!(
        EditorConfig::default().media_api_path(),
        Err(FieldError::Config(_))
    ));
}
