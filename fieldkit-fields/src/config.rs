//! Editor-wide configuration.

use crate::error::{FieldError, FieldResult};
use fieldkit_crypto::HashParams;
use serde::{Deserialize, Serialize};

/// Settings shared by every view and every save/delete pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub title: String,
    /// Path prefix the editor is mounted under.
    pub base_path: String,
    /// Endpoint of the backing store.
    pub data_url: String,
    /// Endpoint of the media API; media fields cannot be saved without it.
    pub media_api_path: Option<String>,
    /// Argon2 costs used when hashing passwords.
    pub password_hashing: HashParams,
    /// Field type tags that inference must never pick.
    pub ignored_field_types: Vec<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            title: "Editor".to_string(),
            base_path: "/".to_string(),
            data_url: "/api/data".to_string(),
            media_api_path: None,
            password_hashing: HashParams::default(),
            ignored_field_types: Vec::new(),
        }
    }
}

impl EditorConfig {
    /// Parses a configuration from JSON; missing members take defaults.
    pub fn from_json(json: &str) -> FieldResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        if !config.base_path.starts_with('/') {
            return Err(FieldError::Config(format!(
                "base path must start with '/', got \"{}\"",
                config.base_path
            )));
        }
        Ok(config)
    }

    /// The media API path, or an error when media is not configured.
    pub fn media_api_path(&self) -> FieldResult<&str> {
        self.media_api_path
            .as_deref()
            .ok_or_else(|| FieldError::Config("media API path is not configured".to_string()))
    }
}
