use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A record as returned by the backing store.
///
/// `value` holds the raw stored value whose shape is described by the
/// record's model; the field engine decodes it into an editable value tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub model: String,
    pub created: i64,
    pub updated: i64,
    pub value: Value,
}

impl Record {
    /// Extract a string value from `value` using a JSON pointer (e.g., "/title").
    pub fn get_str(&self, pointer: &str) -> Option<&str> {
        self.value.pointer(pointer).and_then(|v| v.as_str())
    }

    /// Extract a boolean value from `value` using a JSON pointer.
    pub fn get_bool(&self, pointer: &str) -> Option<bool> {
        self.value.pointer(pointer).and_then(|v| v.as_bool())
    }

    /// Extract a numeric value from `value` using a JSON pointer.
    pub fn get_number(&self, pointer: &str) -> Option<f64> {
        self.value.pointer(pointer).and_then(|v| v.as_f64())
    }

    /// Returns a reference pointing at this record.
    pub fn reference(&self) -> RecordRef {
        RecordRef::new(self.model.clone(), self.id.clone())
    }
}

/// Reference to a record of a given model.
///
/// Stored as a `[model, id]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordRef {
    pub model: String,
    pub id: String,
}

impl RecordRef {
    pub fn new(model: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            id: id.into(),
        }
    }

    /// Parses the stored `[model, id]` form.
    pub fn from_raw(raw: &Value) -> ModelResult<Self> {
        match raw.as_array().map(Vec::as_slice) {
            Some([Value::String(model), Value::String(id)]) => Ok(Self::new(model.clone(), id.clone())),
            _ => Err(ModelError::InvalidReference(raw.to_string())),
        }
    }

    /// Returns the stored `[model, id]` form.
    pub fn to_raw(&self) -> Value {
        Value::Array(vec![
            Value::String(self.model.clone()),
            Value::String(self.id.clone()),
        ])
    }
}
