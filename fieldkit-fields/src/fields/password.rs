use super::{decode_error, mismatch, mismatch_message, Field, FieldId, FieldInfo, LeafField};
use crate::builder::FieldBuilder;
use crate::context::SaveContext;
use crate::error::{FieldError, FieldResult};
use crate::registry::FieldKind;
use crate::value::{FieldData, FieldValue, PasswordValue};
use fieldkit_model::{FieldOptions, Model};
use fieldkit_types::Expression;
use serde_json::Value;
use tracing::debug;

/// Password entry with confirmation, persisted only as a hash.
///
/// Only selected through an explicit `password` type on a string model.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordField {
    pub info: FieldInfo,
}

impl PasswordField {
    pub(crate) fn create(
        builder: &mut FieldBuilder<'_>,
        model: &Model,
        options: Option<&FieldOptions>,
    ) -> FieldId {
        if !matches!(model, Model::String) {
            return builder.mismatch(FieldKind::Password, model);
        }
        builder.push(Field::Password(Self {
            info: FieldInfo::from_options(options),
        }))
    }

    /// Hashes a newly entered password and clears the plaintext.
    ///
    /// Values without a new, confirmed password are returned unchanged.
    pub(crate) async fn on_save(&self, value: &FieldValue, ctx: &SaveContext) -> FieldResult<FieldValue> {
        let FieldData::Password(password) = &value.value else {
            return Ok(value.clone());
        };
        if password.password.is_empty() || password.password != password.password_confirm {
            return Ok(value.clone());
        }

        debug!("Hashing new password for {}", ctx.model);
        let salt = ctx.worker.generate_salt().await?;
        let hash = ctx.worker.generate_hash(&password.password, &salt).await?;

        let data = FieldData::Password(PasswordValue {
            hash: Some(hash),
            password: String::new(),
            password_confirm: String::new(),
        });
        let error = self.validate(&data);
        Ok(FieldValue {
            has_changes: value.has_changes,
            ..FieldValue::new(data, error)
        })
    }
}

impl LeafField for PasswordField {
    fn kind(&self) -> FieldKind {
        FieldKind::Password
    }

    fn info(&self) -> &FieldInfo {
        &self.info
    }

    fn default_data(&self) -> FieldData {
        FieldData::Password(PasswordValue::default())
    }

    fn validate(&self, data: &FieldData) -> Option<String> {
        let FieldData::Password(value) = data else {
            return Some(mismatch_message("password", data));
        };
        if value.password != value.password_confirm {
            Some("passwords do not match".to_string())
        } else if value.hash.is_none() && value.password.is_empty() {
            Some("password is required".to_string())
        } else {
            None
        }
    }

    fn decode(&self, raw: &Value) -> Result<FieldData, String> {
        match raw {
            Value::String(hash) => Ok(FieldData::Password(PasswordValue {
                hash: Some(hash.clone()),
                ..PasswordValue::default()
            })),
            Value::Null => Ok(self.default_data()),
            other => Err(decode_error("password hash", other)),
        }
    }

    /// Only the hash is ever encoded; plaintext must go through `on_save`.
    fn encode(&self, data: &FieldData) -> FieldResult<Expression> {
        match data {
            FieldData::Password(PasswordValue {
                hash: Some(hash),
                password,
                ..
            }) if password.is_empty() => Ok(Expression::String(hash.clone())),
            FieldData::Password(_) => Err(FieldError::InvalidValue(
                "password has not been hashed".to_string(),
            )),
            other => Err(mismatch("password", other)),
        }
    }
}
