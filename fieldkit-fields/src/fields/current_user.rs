use super::{mismatch, mismatch_message, Field, FieldId, FieldInfo, LeafField};
use crate::builder::FieldBuilder;
use crate::error::FieldResult;
use crate::registry::FieldKind;
use crate::value::FieldData;
use fieldkit_model::{FieldOptions, Model, RecordRef};
use fieldkit_types::Expression;
use serde_json::Value;

/// Reference that the store fills in with the signed-in user on save.
///
/// Only selected through an explicit `currentUser` type on a ref model.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUserField {
    pub info: FieldInfo,
    pub model: String,
}

impl CurrentUserField {
    pub(crate) fn create(
        builder: &mut FieldBuilder<'_>,
        model: &Model,
        options: Option<&FieldOptions>,
    ) -> FieldId {
        let Model::Ref { model: target } = model else {
            return builder.mismatch(FieldKind::CurrentUser, model);
        };
        builder.push(Field::CurrentUser(Self {
            info: FieldInfo::from_options(options),
            model: target.clone(),
        }))
    }
}

impl LeafField for CurrentUserField {
    fn kind(&self) -> FieldKind {
        FieldKind::CurrentUser
    }

    fn info(&self) -> &FieldInfo {
        &self.info
    }

    fn default_data(&self) -> FieldData {
        FieldData::CurrentUser(None)
    }

    fn validate(&self, data: &FieldData) -> Option<String> {
        match data {
            FieldData::CurrentUser(_) => None,
            other => Some(mismatch_message("currentUser", other)),
        }
    }

    fn decode(&self, raw: &Value) -> Result<FieldData, String> {
        match raw {
            Value::Null => Ok(FieldData::CurrentUser(None)),
            other => RecordRef::from_raw(other)
                .map(|reference| FieldData::CurrentUser(Some(reference)))
                .map_err(|e| e.to_string()),
        }
    }

    fn encode(&self, data: &FieldData) -> FieldResult<Expression> {
        match data {
            FieldData::CurrentUser(_) => Ok(Expression::CurrentUser),
            other => Err(mismatch("currentUser", other)),
        }
    }
}
