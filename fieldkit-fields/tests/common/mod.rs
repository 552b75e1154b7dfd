//! Shared test helpers for field tests.

#![allow(dead_code)]

use fieldkit_fields::mock::{MockSession, MockWorker};
use fieldkit_fields::{EditorConfig, FieldRegistry, FieldTree, HookContext};
use fieldkit_model::{FieldOptions, Model};
use std::sync::Arc;

/// Installs a subscriber once so `RUST_LOG=debug` shows engine logs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Builds and initializes a tree with the default registry.
pub fn tree(model: &Model) -> FieldTree {
    FieldTree::from_model(model, None, &FieldRegistry::default())
}

pub fn tree_with(model: &Model, options: &FieldOptions) -> FieldTree {
    FieldTree::from_model(model, Some(options), &FieldRegistry::default())
}

/// A blog article: scalars, an enum, tags and an optional cover image.
pub fn article_model() -> Model {
    Model::structure([
        ("title", Model::String),
        ("published", Model::Bool),
        ("rating", Model::Uint8),
        ("status", Model::enumeration(["draft", "review", "live"])),
        ("tags", Model::list(Model::String)),
        (
            "cover",
            Model::optional(Model::annotation(
                "field:media",
                Model::structure([("id", Model::String)]),
            )),
        ),
    ])
}

/// A tree node with a label and child nodes, as a recursive group.
pub fn node_model() -> Model {
    Model::recursive(
        "node",
        [(
            "node",
            Model::structure([
                ("label", Model::String),
                ("children", Model::list(Model::recurse("node"))),
            ]),
        )],
    )
}

pub fn media_config() -> Arc<EditorConfig> {
    Arc::new(EditorConfig {
        media_api_path: Some("/api/media".to_string()),
        ..EditorConfig::default()
    })
}

/// Hook context over fresh mocks; returns the mocks for assertions.
pub fn hook_context(id: Option<&str>) -> (HookContext, Arc<MockWorker>, Arc<MockSession>) {
    let worker = Arc::new(MockWorker::new());
    let session = Arc::new(MockSession::new());
    let ctx = HookContext::new(
        "article",
        id.map(str::to_string),
        media_config(),
        worker.clone(),
        session.clone(),
    );
    (ctx, worker, session)
}
