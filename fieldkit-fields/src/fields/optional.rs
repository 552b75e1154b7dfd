use super::{inherited_options, mismatch, mismatch_message, Field, FieldId, FieldInfo};
use crate::builder::FieldBuilder;
use crate::error::{FieldError, FieldResult};
use crate::registry::FieldKind;
use crate::tree::{FieldRef, FieldTree};
use crate::value::{FieldData, FieldValue, OptionalValue};
use fieldkit_model::{FieldOptions, Model};
use fieldkit_types::{Expression, KeySegment, ValuePath, ValuePathSegment};
use serde_json::Value;

/// Child that may be absent.
///
/// Key paths pass straight through to the child; value paths gain an
/// `optional` step.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionalField {
    pub info: FieldInfo,
    pub field: FieldId,
}

impl OptionalField {
    pub(crate) fn create(
        builder: &mut FieldBuilder<'_>,
        model: &Model,
        options: Option<&FieldOptions>,
    ) -> FieldId {
        let Model::Optional { model: inner } = model else {
            return builder.mismatch(FieldKind::Optional, model);
        };
        let child_options = inherited_options(options);
        let field = builder.create_field(inner, Some(&child_options));
        builder.push(Field::Optional(Self {
            info: FieldInfo::from_options(options),
            field,
        }))
    }

    pub fn child<'t>(&self, tree: &'t FieldTree) -> FieldRef<'t> {
        tree.get(self.field)
    }

    pub(crate) fn default_data(&self) -> FieldData {
        FieldData::Optional(OptionalValue::default())
    }

    pub(crate) fn validate(&self, data: &FieldData) -> Option<String> {
        match data {
            FieldData::Optional(OptionalValue {
                is_present: false, ..
            }) => None,
            FieldData::Optional(OptionalValue {
                value: Some(value), ..
            }) if value.is_valid => None,
            FieldData::Optional(OptionalValue { value: Some(_), .. }) => {
                Some("value is invalid".to_string())
            }
            FieldData::Optional(OptionalValue { value: None, .. }) => {
                Some("value is missing".to_string())
            }
            other => Some(mismatch_message("optional", other)),
        }
    }

    /// `null` decodes as absent.
    pub(crate) fn decode(&self, tree: &FieldTree, raw: &Value) -> Result<FieldData, String> {
        Ok(FieldData::Optional(match raw {
            Value::Null => OptionalValue::default(),
            other => OptionalValue {
                is_present: true,
                value: Some(Box::new(self.child(tree).transform_raw_value(other))),
            },
        }))
    }

    pub(crate) fn encode(&self, tree: &FieldTree, data: &FieldData) -> FieldResult<Expression> {
        match data {
            FieldData::Optional(OptionalValue {
                is_present: false, ..
            }) => Ok(Expression::Null),
            FieldData::Optional(OptionalValue {
                value: Some(value), ..
            }) => self.child(tree).transform_value_to_expression(value),
            FieldData::Optional(_) => Err(FieldError::InvalidValue("value is missing".to_string())),
            other => Err(mismatch("optional", other)),
        }
    }

    pub(crate) fn traverse<'t>(&self, tree: &'t FieldTree, path: &[KeySegment]) -> Option<FieldRef<'t>> {
        self.child(tree).traverse(path)
    }

    /// Gains the `optional` step only when the child descends at least
    /// one segment.
    pub(crate) fn value_path(&self, tree: &FieldTree, path: &[KeySegment]) -> ValuePath {
        let inner = self.child(tree).value_path_for_key_path(path);
        if inner.is_empty() {
            return inner;
        }
        inner.prefixed(ValuePathSegment::Optional)
    }

    pub(crate) fn values<'v>(
        &self,
        tree: &FieldTree,
        data: &'v FieldData,
        path: &[KeySegment],
    ) -> Vec<&'v FieldValue> {
        match data {
            FieldData::Optional(OptionalValue {
                is_present: true,
                value: Some(value),
            }) => self.child(tree).values_for_key_path(value, path),
            _ => Vec::new(),
        }
    }

    pub(crate) fn options(&self, tree: &FieldTree) -> FieldOptions {
        FieldOptions {
            field: Some(Box::new(self.child(tree).options())),
            ..self.info.to_options(FieldKind::Optional)
        }
    }
}
