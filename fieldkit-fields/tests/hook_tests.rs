mod common;

use common::{article_model, hook_context, init_tracing, media_config, tree_with};
use fieldkit_crypto::{verify_password, HashParams};
use fieldkit_fields::mock::{MockSession, MockWorker};
use fieldkit_fields::{
    EditorConfig, FieldData, FieldError, FieldRef, FieldRegistry, FieldValue, HashWorker,
    HookContext, ListItem, Media, MediaValue, PasswordValue, ViewContext, WorkerContext,
    MEDIA_ANNOTATION,
};
use fieldkit_model::{FieldOptions, Model};
use fieldkit_types::KeySegment;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn media_struct() -> Model {
    Model::annotation(MEDIA_ANNOTATION, Model::structure([("id", Model::String)]))
}

fn account_model() -> Model {
    Model::structure([
        ("name", Model::String),
        ("password", Model::String),
        ("avatar", media_struct()),
        ("gallery", Model::list(media_struct())),
    ])
}

fn account_options() -> FieldOptions {
    FieldOptions {
        fields: Some(vec![(KeySegment::from("password"), FieldOptions::of_type("password"))]),
        ..FieldOptions::default()
    }
}

fn media(id: &str) -> Media {
    Media {
        id: id.to_string(),
        filename: format!("{id}.png"),
        mime_type: "image/png".to_string(),
        url: format!("/uploads/{id}"),
        size: 42,
    }
}

fn media_value(stored: Option<&str>, uploaded: Option<&str>) -> FieldValue {
    FieldValue::new(
        FieldData::Media(MediaValue {
            media: stored.map(media),
            uploaded: uploaded.map(media),
        }),
        None,
    )
}

fn password_value(password: &str, confirm: &str) -> FieldValue {
    FieldValue::new(
        FieldData::Password(PasswordValue {
            hash: None,
            password: password.to_string(),
            password_confirm: confirm.to_string(),
        }),
        None,
    )
}

fn entry<'v>(value: &'v FieldValue, key: &str) -> &'v FieldData {
    &value.value.struct_entry(key).unwrap().value
}

fn stored_media_id(data: &FieldData) -> Option<&str> {
    match data {
        FieldData::Media(MediaValue { media, uploaded: None }) => media.as_ref().map(|m| m.id.as_str()),
        other => panic!("expected committed media, got {other:?}"),
    }
}

/// Account value with a password, an avatar and a two-image gallery.
fn account_value(field: FieldRef<'_>, password: FieldValue, avatar: FieldValue, gallery: Vec<FieldValue>) -> FieldValue {
    let value = field.default_value();
    let value = field.struct_set(&value, "password", password);
    let value = field.struct_set(&value, "avatar", avatar);
    let gallery_field = field.traverse(&[KeySegment::from("gallery")]).unwrap();
    let gallery = gallery_field.update(FieldData::List(gallery.into_iter().map(ListItem::new).collect()));
    field.struct_set(&value, "gallery", gallery)
}

// ── Password ─────────────────────────────────────────────────────

#[tokio::test]
async fn password_is_hashed_once_on_save() {
    init_tracing();
    let tree = tree_with(&account_model(), &account_options());
    let field = tree.root();
    let (ctx, worker, _session) = hook_context(Some("acc-1"));

    let value = account_value(field, password_value("pw", "pw"), media_value(Some("m1"), None), Vec::new());
    assert!(value.has_changes);

    let saved = field.on_save(&value, &ctx).await.unwrap();
    assert_eq!(worker.salt_calls(), 1);
    assert_eq!(worker.hash_calls(), 1);
    assert_eq!(
        entry(&saved, "password"),
        &FieldData::Password(PasswordValue {
            hash: Some("hash(pw:salt-0)".to_string()),
            password: String::new(),
            password_confirm: String::new(),
        })
    );
    assert!(saved.is_valid, "{:?}", saved.error);
    assert!(saved.has_changes);
    assert!(field.transform_value_to_expression(&saved).is_ok());
}

#[tokio::test]
async fn mismatched_password_is_left_alone() {
    let tree = tree_with(&account_model(), &account_options());
    let field = tree.root();
    let (ctx, worker, _session) = hook_context(Some("acc-1"));

    let value = account_value(field, password_value("a", "b"), media_value(Some("m1"), None), Vec::new());
    let saved = field.on_save(&value, &ctx).await.unwrap();

    assert_eq!(worker.hash_calls(), 0);
    assert_eq!(entry(&saved, "password"), entry(&value, "password"));
    assert!(!saved.is_valid);
}

#[tokio::test]
async fn input_value_is_not_mutated() {
    let tree = tree_with(&account_model(), &account_options());
    let field = tree.root();
    let (ctx, _worker, _session) = hook_context(Some("acc-1"));

    let value = account_value(field, password_value("pw", "pw"), media_value(None, Some("up")), Vec::new());
    let before = value.clone();
    field.on_save(&value, &ctx).await.unwrap();
    assert_eq!(value, before);
}

// ── Media ────────────────────────────────────────────────────────

#[tokio::test]
async fn uploads_are_committed_in_field_order() {
    let tree = tree_with(&account_model(), &account_options());
    let field = tree.root();
    let (ctx, _worker, session) = hook_context(Some("acc-1"));

    let value = account_value(
        field,
        password_value("", ""),
        media_value(None, Some("up-avatar")),
        vec![media_value(None, Some("up-1")), media_value(Some("g2"), Some("up-2"))],
    );
    let saved = field.on_save(&value, &ctx).await.unwrap();

    assert_eq!(
        session.media_log(),
        vec!["commit:up-avatar", "commit:up-1", "commit:up-2"]
    );
    assert_eq!(stored_media_id(entry(&saved, "avatar")), Some("media-up-avatar"));

    let FieldData::List(gallery) = entry(&saved, "gallery") else {
        panic!("expected gallery list");
    };
    let ids: Vec<_> = gallery.iter().map(|item| stored_media_id(&item.value.value)).collect();
    assert_eq!(ids, vec![Some("media-up-1"), Some("g2")]);

    // Element ids survive the hook run.
    let FieldData::List(before) = entry(&value, "gallery") else {
        panic!("expected gallery list");
    };
    assert_eq!(
        gallery.iter().map(|item| item.id).collect::<Vec<_>>(),
        before.iter().map(|item| item.id).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn media_is_copied_into_new_records() {
    let tree = tree_with(&account_model(), &account_options());
    let field = tree.root();

    let value = account_value(field, password_value("", ""), media_value(Some("m1"), None), Vec::new());

    let (new_ctx, _worker, session) = hook_context(None);
    let saved = field.on_save(&value, &new_ctx).await.unwrap();
    assert_eq!(session.media_log(), vec!["copy:m1"]);
    assert_eq!(stored_media_id(entry(&saved, "avatar")), Some("m1-copy"));

    let (existing_ctx, _worker, session) = hook_context(Some("acc-1"));
    let saved = field.on_save(&value, &existing_ctx).await.unwrap();
    assert!(session.media_log().is_empty());
    assert_eq!(saved, value);
}

#[tokio::test]
async fn media_requires_configured_api_path() {
    let tree = tree_with(&account_model(), &account_options());
    let field = tree.root();
    let ctx = HookContext::new(
        "account",
        Some("acc-1".to_string()),
        Arc::new(EditorConfig::default()),
        Arc::new(MockWorker::new()),
        Arc::new(MockSession::new()),
    );

    let value = account_value(field, password_value("", ""), media_value(None, Some("up")), Vec::new());
    let result = field.on_save(&value, &ctx).await;
    assert!(matches!(result, Err(FieldError::Config(_))));
}

#[tokio::test]
async fn delete_removes_all_media() {
    let tree = tree_with(&account_model(), &account_options());
    let field = tree.root();
    let (ctx, worker, session) = hook_context(Some("acc-1"));

    let value = account_value(
        field,
        password_value("pw", "pw"),
        media_value(Some("avatar"), None),
        vec![media_value(Some("g1"), None), media_value(Some("g2"), None)],
    );
    let deleted = field.on_delete(&value, &ctx).await.unwrap();

    assert_eq!(session.media_log(), vec!["delete:avatar", "delete:g1", "delete:g2"]);
    assert_eq!(stored_media_id(entry(&deleted, "avatar")), None);
    // Passwords have no delete hook.
    assert_eq!(worker.hash_calls(), 0);
}

// ── Composites ───────────────────────────────────────────────────

#[tokio::test]
async fn only_selected_union_branch_runs() {
    let model = Model::union([("upload", media_struct()), ("upload2", media_struct())]);
    let tree = common::tree(&model);
    let field = tree.root();
    let (ctx, _worker, session) = hook_context(Some("r1"));

    let value = field.union_set_value(&field.default_value(), "upload", media_value(None, Some("a")));
    let value = field.union_select(&value, "upload2");
    let value = field.union_set_value(&value, "upload2", media_value(None, Some("b")));

    field.on_save(&value, &ctx).await.unwrap();
    assert_eq!(session.media_log(), vec!["commit:b"]);
}

#[tokio::test]
async fn absent_optional_is_skipped() {
    let tree = common::tree(&article_model());
    let field = tree.root();
    let (ctx, _worker, session) = hook_context(None);

    let value = field.default_value();
    let saved = field.on_save(&value, &ctx).await.unwrap();
    assert!(session.media_log().is_empty());
    assert_eq!(saved, value);
}

#[test]
fn hook_presence() {
    let tree = tree_with(&account_model(), &account_options());
    let root = tree.root();
    let child = |key: &str| root.traverse(&[KeySegment::from(key)]).unwrap();

    assert!(root.has_save_hook());
    assert!(child("password").has_save_hook());
    assert!(!child("password").has_delete_hook());
    assert!(child("avatar").has_delete_hook());
    assert!(!child("name").has_save_hook());
}

// ── View context pipeline ────────────────────────────────────────

#[tokio::test]
async fn view_context_saves_and_deletes_records() {
    let config = media_config();
    let view = ViewContext::infer_from_model("article", article_model(), &FieldRegistry::default(), &config);
    let (ctx, _worker, session) = hook_context(None);

    let value = view.field().default_value().changed();
    let (record, saved) = view.save_value(&value, &ctx).await.unwrap();
    assert_eq!(record.model, "article");
    assert_eq!(session.record_count(), 1);
    assert!(!saved.has_changes);
    assert_eq!(view.decode_record(&record), saved);

    let delete_ctx = HookContext {
        id: Some(record.id.clone()),
        ..ctx.clone()
    };
    view.delete_value(&saved, &delete_ctx).await.unwrap();
    assert_eq!(session.record_count(), 0);
}

#[tokio::test]
async fn invalid_values_are_not_stored() {
    let config = media_config();
    let view = ViewContext::infer_from_model("article", article_model(), &FieldRegistry::default(), &config);
    let (ctx, _worker, session) = hook_context(None);

    let field = view.field();
    let value = field.transform_raw_value(&serde_json::json!({ "title": 1 }));
    let cover_field = field.traverse(&[KeySegment::from("cover")]).unwrap();
    let cover = value.value.struct_entry("cover").unwrap();
    let cover = cover_field.optional_set_value(cover, media_value(None, Some("up1")));
    let value = field.struct_set(&value, "cover", cover);
    assert!(!value.is_valid);

    let result = view.save_value(&value, &ctx).await;
    assert!(matches!(result, Err(FieldError::InvalidValue(_))));
    assert_eq!(session.record_count(), 0);
    assert!(session.media_log().is_empty());
}

#[tokio::test]
async fn delete_needs_a_record_id() {
    let config = EditorConfig::default();
    let view = ViewContext::infer_from_model("article", article_model(), &FieldRegistry::default(), &config);
    let (ctx, _worker, _session) = hook_context(None);

    let value = view.field().default_value();
    assert!(matches!(
        view.delete_value(&value, &ctx).await,
        Err(FieldError::InvalidValue(_))
    ));
}

// ── Hash worker ──────────────────────────────────────────────────

#[tokio::test]
async fn hash_worker_produces_verifiable_hashes() {
    let worker = HashWorker::new(HashParams::test());
    let salt = worker.generate_salt().await.unwrap();
    let hash = worker.generate_hash("correct horse", &salt).await.unwrap();

    assert!(verify_password("correct horse", &hash).unwrap());
    assert!(!verify_password("wrong horse", &hash).unwrap());
}

#[tokio::test]
async fn hash_worker_rejects_malformed_salt() {
    let worker = HashWorker::new(HashParams::test());
    assert!(worker.generate_hash("pw", "not base64!").await.is_err());
}
