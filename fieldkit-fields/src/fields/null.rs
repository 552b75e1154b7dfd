use super::{decode_error, mismatch, mismatch_message, Field, FieldId, FieldInfo, LeafField};
use crate::builder::FieldBuilder;
use crate::error::FieldResult;
use crate::registry::FieldKind;
use crate::value::FieldData;
use fieldkit_model::{FieldOptions, Model};
use fieldkit_types::Expression;
use serde_json::Value;

/// Carries no data. Mostly seen as a union branch that only marks a choice.
#[derive(Debug, Clone, PartialEq)]
pub struct NullField {
    pub info: FieldInfo,
}

impl NullField {
    pub(crate) fn create(
        builder: &mut FieldBuilder<'_>,
        model: &Model,
        options: Option<&FieldOptions>,
    ) -> FieldId {
        if !matches!(model, Model::Null) {
            return builder.mismatch(FieldKind::Null, model);
        }
        builder.push(Field::Null(Self {
            info: FieldInfo::from_options(options),
        }))
    }
}

impl LeafField for NullField {
    fn kind(&self) -> FieldKind {
        FieldKind::Null
    }

    fn info(&self) -> &FieldInfo {
        &self.info
    }

    fn default_data(&self) -> FieldData {
        FieldData::Null
    }

    fn validate(&self, data: &FieldData) -> Option<String> {
        match data {
            FieldData::Null => None,
            other => Some(mismatch_message("null", other)),
        }
    }

    fn decode(&self, raw: &Value) -> Result<FieldData, String> {
        match raw {
            Value::Null => Ok(FieldData::Null),
            other => Err(decode_error("null", other)),
        }
    }

    fn encode(&self, data: &FieldData) -> FieldResult<Expression> {
        match data {
            FieldData::Null => Ok(Expression::Null),
            other => Err(mismatch("null", other)),
        }
    }
}
