use super::{FieldInfo, LeafField};
use crate::error::{FieldError, FieldResult};
use crate::registry::FieldKind;
use crate::value::FieldData;
use fieldkit_model::FieldOptions;
use fieldkit_types::Expression;
use serde_json::Value;

/// Placeholder for a node that could not be built.
///
/// Keeps the raw value it is given untouched, is never valid and refuses to
/// encode, so a schema problem in one subtree never takes down the rest of
/// the form.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorField {
    pub info: FieldInfo,
    pub message: String,
}

impl ErrorField {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            info: FieldInfo::default(),
            message: message.into(),
        }
    }
}

impl LeafField for ErrorField {
    fn kind(&self) -> FieldKind {
        FieldKind::Error
    }

    fn info(&self) -> &FieldInfo {
        &self.info
    }

    fn default_data(&self) -> FieldData {
        FieldData::Invalid(Value::Null)
    }

    fn validate(&self, _data: &FieldData) -> Option<String> {
        Some(self.message.clone())
    }

    fn decode(&self, raw: &Value) -> Result<FieldData, String> {
        Ok(FieldData::Invalid(raw.clone()))
    }

    fn encode(&self, _data: &FieldData) -> FieldResult<Expression> {
        Err(FieldError::InvalidValue(self.message.clone()))
    }

    /// Nothing to persist; the node is rebuilt from the model next time.
    fn options(&self) -> FieldOptions {
        FieldOptions::default()
    }
}
