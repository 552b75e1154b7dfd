//! The value envelope every field operates on.
//!
//! A [`FieldValue`] wraps the editable data of one field together with its
//! validation outcome and a dirty flag. Composite data nests further
//! envelopes, so every node of a value tree carries its own validity.

use chrono::{DateTime, Utc};
use fieldkit_model::RecordRef;
use fieldkit_types::ElementId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Editable value of one field plus its validation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    pub value: FieldData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub is_valid: bool,
    pub has_changes: bool,
}

impl FieldValue {
    /// Wraps `value`; it is valid exactly when `error` is `None`.
    pub fn new(value: FieldData, error: Option<String>) -> Self {
        Self {
            value,
            is_valid: error.is_none(),
            error,
            has_changes: false,
        }
    }

    /// Returns this value flagged as edited.
    #[must_use]
    pub fn changed(mut self) -> Self {
        self.has_changes = true;
        self
    }

    /// Clears the dirty flag on this value and every nested value.
    pub fn mark_saved(&mut self) {
        self.has_changes = false;
        match &mut self.value {
            FieldData::Struct(entries) | FieldData::Union(UnionValue { values: entries, .. }) => {
                entries.iter_mut().for_each(|(_, v)| v.mark_saved());
            }
            FieldData::Tuple(items) => items.iter_mut().for_each(FieldValue::mark_saved),
            FieldData::Optional(OptionalValue {
                value: Some(inner), ..
            }) => inner.mark_saved(),
            FieldData::List(items) => items.iter_mut().for_each(|item| item.value.mark_saved()),
            FieldData::Map(items) => items.iter_mut().for_each(|item| item.value.mark_saved()),
            _ => {}
        }
    }
}

/// Variant-specific payload of a [`FieldValue`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum FieldData {
    String(String),
    Bool(bool),
    Number(NumberValue),
    DateTime(DateTimeValue),
    /// Selected option key.
    Enum(Option<String>),
    Null,
    CurrentUser(Option<RecordRef>),
    Ref(Option<RecordRef>),
    Password(PasswordValue),
    Media(MediaValue),
    /// Raw data that could not be decoded for its field.
    Invalid(Value),
    Struct(Vec<(String, FieldValue)>),
    Tuple(Vec<FieldValue>),
    Union(UnionValue),
    Optional(OptionalValue),
    /// Used for both lists and sets.
    List(Vec<ListItem>),
    Map(Vec<MapItem>),
}

impl FieldData {
    /// Short name of the payload shape, used in mismatch diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::DateTime(_) => "dateTime",
            Self::Enum(_) => "enum",
            Self::Null => "null",
            Self::CurrentUser(_) => "currentUser",
            Self::Ref(_) => "ref",
            Self::Password(_) => "password",
            Self::Media(_) => "media",
            Self::Invalid(_) => "invalid",
            Self::Struct(_) => "struct",
            Self::Tuple(_) => "tuple",
            Self::Union(_) => "union",
            Self::Optional(_) => "optional",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// Looks up a struct entry by key.
    pub fn struct_entry(&self, key: &str) -> Option<&FieldValue> {
        match self {
            Self::Struct(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

/// A number as entered or stored.
///
/// Integers keep their exact value; only `float` storage and fractional
/// input go through `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NumberValue {
    Int(i64),
    Uint(u64),
    Float(f64),
}

impl NumberValue {
    /// Reads a JSON number, preferring the exact integer forms.
    pub fn from_json(raw: &Value) -> Option<Self> {
        raw.as_i64()
            .map(Self::Int)
            .or_else(|| raw.as_u64().map(Self::Uint))
            .or_else(|| raw.as_f64().map(Self::Float))
    }

    /// Narrowest of `Int` and `Uint` that holds `n`.
    pub fn from_integer(n: i128) -> Self {
        match i64::try_from(n) {
            Ok(n) => Self::Int(n),
            Err(_) => u64::try_from(n).map_or(Self::Float(n as f64), Self::Uint),
        }
    }

    /// The exact integer, or `None` for non-finite and fractional floats.
    pub fn as_integer(self) -> Option<i128> {
        match self {
            Self::Int(n) => Some(n.into()),
            Self::Uint(n) => Some(n.into()),
            Self::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 2f64.powi(127) => {
                Some(f as i128)
            }
            Self::Float(_) => None,
        }
    }

    /// Lossy conversion for display, sorting and `float` storage.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(n) => n as f64,
            Self::Uint(n) => n as f64,
            Self::Float(f) => f,
        }
    }
}

/// Date-time input as typed by the user plus its parsed instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateTimeValue {
    pub input: String,
    pub date: Option<DateTime<Utc>>,
}

impl DateTimeValue {
    /// Parses an RFC 3339 input; unparsable input keeps `date` empty.
    pub fn parse(input: impl Into<String>) -> Self {
        let input = input.into();
        let date = DateTime::parse_from_rfc3339(input.trim())
            .ok()
            .map(|date| date.with_timezone(&Utc));
        Self { input, date }
    }

    pub fn from_date(date: DateTime<Utc>) -> Self {
        Self {
            input: date.to_rfc3339(),
            date: Some(date),
        }
    }
}

/// Password editing state.
///
/// `hash` is the persisted PHC string; `password` and `password_confirm`
/// hold plaintext only until the next save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordValue {
    pub hash: Option<String>,
    pub password: String,
    pub password_confirm: String,
}

/// Stored media file as returned by the media API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: String,
    pub filename: String,
    pub mime_type: String,
    pub url: String,
    pub size: u64,
}

/// Media editing state: the committed media and a staged upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaValue {
    pub media: Option<Media>,
    pub uploaded: Option<Media>,
}

/// Union state.
///
/// Values of branches that are not selected are retained so switching back
/// restores them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnionValue {
    pub selected: Option<String>,
    pub values: Vec<(String, FieldValue)>,
}

impl UnionValue {
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Value of the selected branch.
    pub fn selected_value(&self) -> Option<(&str, &FieldValue)> {
        let key = self.selected.as_deref()?;
        self.get(key).map(|value| (key, value))
    }
}

/// Optional state.
///
/// `value` is materialized lazily on first presence and kept when the
/// optional is switched off again.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionalValue {
    pub is_present: bool,
    pub value: Option<Box<FieldValue>>,
}

/// One list or set entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: ElementId,
    pub value: FieldValue,
}

impl ListItem {
    pub fn new(value: FieldValue) -> Self {
        Self {
            id: ElementId::new(),
            value,
        }
    }
}

/// One map entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapItem {
    pub id: ElementId,
    pub key: String,
    pub value: FieldValue,
}

impl MapItem {
    pub fn new(key: impl Into<String>, value: FieldValue) -> Self {
        Self {
            id: ElementId::new(),
            key: key.into(),
            value,
        }
    }
}

/// Name of a raw JSON value's type, used in decode diagnostics.
pub(crate) fn json_type_name(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
