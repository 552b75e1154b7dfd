use fieldkit_types::{KeyPath, KeySegment};
use serde::{Deserialize, Serialize};

/// Persisted editor configuration for one field node.
///
/// The tree mirrors the field tree: composite options carry their children
/// in `fields` (struct, tuple, union, recursive) or `field` (optional, list,
/// set, map, recursion). Every member is optional so an empty object is a
/// valid configuration, and absent members are skipped when serializing so
/// stored JSON stays small and diffable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOptions {
    /// Explicit variant override, e.g. `"password"` on a string model.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Child options in display order. Struct keys not listed keep schema
    /// order after the listed ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<(KeySegment, FieldOptions)>>,
    /// Options of the single wrapped child.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<Box<FieldOptions>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiline: Option<bool>,

    /// Enum option labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<EnumOption>>,

    /// Closed set of permitted map keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricted_to_keys: Option<Vec<String>>,
}

impl FieldOptions {
    /// Options that only force a variant.
    pub fn of_type(field_type: impl Into<String>) -> Self {
        Self {
            field_type: Some(field_type.into()),
            ..Self::default()
        }
    }

    /// Returns these options with `label` set.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns these options with `description` set.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Looks up the options of the child addressed by `key`.
    pub fn child(&self, key: &KeySegment) -> Option<&FieldOptions> {
        self.fields
            .as_ref()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, options)| options)
    }

    /// Looks up the options of a keyed child (struct, union, recursive member).
    pub fn child_by_key(&self, key: &str) -> Option<&FieldOptions> {
        self.fields
            .as_ref()?
            .iter()
            .find(|(k, _)| k.as_key() == Some(key))
            .map(|(_, options)| options)
    }

    /// Returns the options of the single wrapped child.
    pub fn inner(&self) -> Option<&FieldOptions> {
        self.field.as_deref()
    }
}

/// Display label of one enum option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumOption {
    pub key: String,
    pub label: String,
}

impl EnumOption {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Persisted view configuration for one model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewContextOptions {
    /// Identity of the model the view edits.
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Key paths whose values summarize a record in lists and pickers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_key_paths: Option<Vec<KeyPath>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldOptions>,
}
