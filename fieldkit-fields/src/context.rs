//! Collaborators used by the save and delete pipelines.
//!
//! Fields never talk to the network or burn CPU on the caller's task
//! directly. Hashing goes through a [`WorkerContext`], record and media
//! calls through a [`SessionContext`]. Both are traits so tests and
//! alternative backends can supply their own.

use crate::config::EditorConfig;
use crate::error::{ContextError, ContextResult};
use crate::value::Media;
use crate::view_context::ViewContext;
use async_trait::async_trait;
use fieldkit_crypto::{hash_password, HashParams, Salt, SecretString};
use fieldkit_model::Record;
use fieldkit_types::Expression;
use std::sync::Arc;
use tracing::debug;

/// Runs expensive work off the caller's task.
#[async_trait]
pub trait WorkerContext: Send + Sync {
    /// Returns a fresh salt in the encoding `generate_hash` expects.
    async fn generate_salt(&self) -> ContextResult<String>;

    /// Hashes `password` with `salt` and returns the string to persist.
    async fn generate_hash(&self, password: &str, salt: &str) -> ContextResult<String>;
}

/// [`WorkerContext`] that hashes with Argon2id on tokio's blocking pool.
#[derive(Debug, Clone, Default)]
pub struct HashWorker {
    params: HashParams,
}

impl HashWorker {
    pub fn new(params: HashParams) -> Self {
        Self { params }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.password_hashing.clone())
    }
}

#[async_trait]
impl WorkerContext for HashWorker {
    async fn generate_salt(&self) -> ContextResult<String> {
        Ok(Salt::random().to_b64())
    }

    async fn generate_hash(&self, password: &str, salt: &str) -> ContextResult<String> {
        let salt = Salt::from_b64(salt)?;
        let password = SecretString::new(password.to_string());
        let params = self.params.clone();

        debug!("Hashing password (m={}, t={})", params.memory_cost, params.time_cost);
        let hash = tokio::task::spawn_blocking(move || hash_password(&password, &salt, &params))
            .await
            .map_err(|e| ContextError::Worker(format!("hash task failed: {e}")))??;
        Ok(hash)
    }
}

/// Access to the backing store and media API on behalf of the signed-in
/// user.
#[async_trait]
pub trait SessionContext: Send + Sync {
    async fn get_record(&self, model: &str, id: &str) -> ContextResult<Record>;

    async fn get_record_list(&self, model: &str) -> ContextResult<Vec<Record>>;

    /// Creates the record when `id` is `None`, otherwise replaces its value.
    async fn save_record(
        &self,
        model: &str,
        id: Option<&str>,
        expression: &Expression,
    ) -> ContextResult<Record>;

    async fn delete_record(&self, model: &str, id: &str) -> ContextResult<()>;

    /// Records that hold a reference to `model`/`id`.
    async fn get_referrers(&self, model: &str, id: &str) -> ContextResult<Vec<Record>>;

    /// View of another model, used to render references to it.
    fn view_context(&self, model: &str) -> Option<Arc<ViewContext>> {
        let _ = model;
        None
    }

    /// Turns a staged upload into permanent media, replacing
    /// `overwrite_id` when given.
    async fn commit_media(
        &self,
        api_path: &str,
        upload_id: &str,
        overwrite_id: Option<&str>,
    ) -> ContextResult<Media> {
        let _ = (upload_id, overwrite_id);
        Err(ContextError::Unsupported(format!("commit media via {api_path}")))
    }

    /// Duplicates stored media, returning the copy.
    async fn copy_media(&self, api_path: &str, media_id: &str) -> ContextResult<Media> {
        let _ = media_id;
        Err(ContextError::Unsupported(format!("copy media via {api_path}")))
    }

    async fn delete_media(&self, api_path: &str, media_id: &str) -> ContextResult<()> {
        let _ = media_id;
        Err(ContextError::Unsupported(format!("delete media via {api_path}")))
    }
}

/// Everything a save or delete hook may need.
#[derive(Clone)]
pub struct HookContext {
    /// Model of the record being saved or deleted.
    pub model: String,
    /// Record id; `None` while saving a record that does not exist yet.
    pub id: Option<String>,
    pub config: Arc<EditorConfig>,
    pub worker: Arc<dyn WorkerContext>,
    pub session: Arc<dyn SessionContext>,
}

impl HookContext {
    pub fn new(
        model: impl Into<String>,
        id: Option<String>,
        config: Arc<EditorConfig>,
        worker: Arc<dyn WorkerContext>,
        session: Arc<dyn SessionContext>,
    ) -> Self {
        Self {
            model: model.into(),
            id,
            config,
            worker,
            session,
        }
    }
}

/// Context of a save pipeline run.
pub type SaveContext = HookContext;

/// Context of a delete pipeline run.
pub type DeleteContext = HookContext;

/// In-memory collaborators for testing.
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard, PoisonError};

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Worker that "hashes" by formatting, and counts its calls.
    #[derive(Debug, Default)]
    pub struct MockWorker {
        salt_calls: AtomicUsize,
        hash_calls: AtomicUsize,
    }

    impl MockWorker {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn salt_calls(&self) -> usize {
            self.salt_calls.load(Ordering::SeqCst)
        }

        pub fn hash_calls(&self) -> usize {
            self.hash_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WorkerContext for MockWorker {
        async fn generate_salt(&self) -> ContextResult<String> {
            let n = self.salt_calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("salt-{n}"))
        }

        async fn generate_hash(&self, password: &str, salt: &str) -> ContextResult<String> {
            self.hash_calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("hash({password}:{salt})"))
        }
    }

    /// Session backed by an in-memory record map.
    ///
    /// Every media call is appended to a log so tests can assert ordering.
    #[derive(Debug, Default)]
    pub struct MockSession {
        records: Mutex<BTreeMap<(String, String), Record>>,
        media_log: Mutex<Vec<String>>,
        next_id: AtomicUsize,
        view_contexts: Mutex<BTreeMap<String, Arc<ViewContext>>>,
    }

    impl MockSession {
        pub fn new() -> Self {
            Self::default()
        }

        /// Inserts a record as if it had been stored earlier.
        pub fn insert_record(&self, record: Record) {
            lock(&self.records).insert((record.model.clone(), record.id.clone()), record);
        }

        pub fn register_view_context(&self, view_context: Arc<ViewContext>) {
            lock(&self.view_contexts).insert(view_context.model_id.clone(), view_context);
        }

        /// Media calls in the order they were made, e.g. `commit:upload-1`.
        pub fn media_log(&self) -> Vec<String> {
            lock(&self.media_log).clone()
        }

        pub fn record_count(&self) -> usize {
            lock(&self.records).len()
        }

        fn log_media(&self, entry: String) {
            lock(&self.media_log).push(entry);
        }
    }

    fn contains_reference(raw: &serde_json::Value, model: &str, id: &str) -> bool {
        use serde_json::Value;
        match raw {
            Value::Array(items) => {
                matches!(items.as_slice(), [Value::String(m), Value::String(i)] if m == model && i == id)
                    || items.iter().any(|item| contains_reference(item, model, id))
            }
            Value::Object(map) => map.values().any(|v| contains_reference(v, model, id)),
            _ => false,
        }
    }

    #[async_trait]
    impl SessionContext for MockSession {
        async fn get_record(&self, model: &str, id: &str) -> ContextResult<Record> {
            lock(&self.records)
                .get(&(model.to_string(), id.to_string()))
                .cloned()
                .ok_or_else(|| ContextError::NotFound(format!("{model}/{id}")))
        }

        async fn get_record_list(&self, model: &str) -> ContextResult<Vec<Record>> {
            Ok(lock(&self.records)
                .values()
                .filter(|record| record.model == model)
                .cloned()
                .collect())
        }

        async fn save_record(
            &self,
            model: &str,
            id: Option<&str>,
            expression: &Expression,
        ) -> ContextResult<Record> {
            let mut records = lock(&self.records);
            let id = match id {
                Some(id) => id.to_string(),
                None => format!("record-{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
            };
            let key = (model.to_string(), id.clone());
            let created = records.get(&key).map_or(0, |existing| existing.created);
            let record = Record {
                id,
                model: model.to_string(),
                created,
                updated: created + 1,
                value: expression.to_raw(),
            };
            records.insert(key, record.clone());
            Ok(record)
        }

        async fn delete_record(&self, model: &str, id: &str) -> ContextResult<()> {
            lock(&self.records)
                .remove(&(model.to_string(), id.to_string()))
                .map(|_| ())
                .ok_or_else(|| ContextError::NotFound(format!("{model}/{id}")))
        }

        async fn get_referrers(&self, model: &str, id: &str) -> ContextResult<Vec<Record>> {
            Ok(lock(&self.records)
                .values()
                .filter(|record| contains_reference(&record.value, model, id))
                .cloned()
                .collect())
        }

        fn view_context(&self, model: &str) -> Option<Arc<ViewContext>> {
            lock(&self.view_contexts).get(model).cloned()
        }

        async fn commit_media(
            &self,
            _api_path: &str,
            upload_id: &str,
            overwrite_id: Option<&str>,
        ) -> ContextResult<Media> {
            self.log_media(format!("commit:{upload_id}"));
            let id = overwrite_id.map_or_else(|| format!("media-{upload_id}"), str::to_string);
            Ok(Media {
                url: format!("/media/{id}"),
                id,
                filename: format!("{upload_id}.bin"),
                mime_type: "application/octet-stream".to_string(),
                size: 0,
            })
        }

        async fn copy_media(&self, _api_path: &str, media_id: &str) -> ContextResult<Media> {
            self.log_media(format!("copy:{media_id}"));
            let id = format!("{media_id}-copy");
            Ok(Media {
                url: format!("/media/{id}"),
                id,
                filename: format!("{media_id}.bin"),
                mime_type: "application/octet-stream".to_string(),
                size: 0,
            })
        }

        async fn delete_media(&self, _api_path: &str, media_id: &str) -> ContextResult<()> {
            self.log_media(format!("delete:{media_id}"));
            Ok(())
        }
    }
}
