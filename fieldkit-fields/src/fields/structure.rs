use super::{decode_error, keyed_options, mismatch, mismatch_message, ordered_members, Field, FieldId, FieldInfo};
use crate::builder::FieldBuilder;
use crate::error::{FieldError, FieldResult};
use crate::registry::FieldKind;
use crate::tree::{FieldRef, FieldTree};
use crate::value::{FieldData, FieldValue};
use fieldkit_model::{FieldOptions, Model};
use fieldkit_types::{Expression, KeySegment, ValuePath, ValuePathSegment};
use serde_json::Value;

/// Fixed set of named children.
#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub info: FieldInfo,
    /// Children in display order.
    pub fields: Vec<(String, FieldId)>,
}

impl StructField {
    pub(crate) fn create(
        builder: &mut FieldBuilder<'_>,
        model: &Model,
        options: Option<&FieldOptions>,
    ) -> FieldId {
        let Model::Struct { fields } = model else {
            return builder.mismatch(FieldKind::Struct, model);
        };
        let children = ordered_members(fields, options)
            .into_iter()
            .map(|(key, child)| {
                let child_options = keyed_options(options, key);
                (key.clone(), builder.create_field(child, Some(&child_options)))
            })
            .collect();
        builder.push(Field::Struct(Self {
            info: FieldInfo::from_options(options),
            fields: children,
        }))
    }

    pub fn child<'t>(&self, tree: &'t FieldTree, key: &str) -> Option<FieldRef<'t>> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, id)| tree.get(*id))
    }

    pub(crate) fn default_data(&self, tree: &FieldTree) -> FieldData {
        FieldData::Struct(
            self.fields
                .iter()
                .map(|(key, id)| (key.clone(), tree.get(*id).default_value()))
                .collect(),
        )
    }

    pub(crate) fn validate(&self, data: &FieldData) -> Option<String> {
        let FieldData::Struct(entries) = data else {
            return Some(mismatch_message("struct", data));
        };
        let invalid: Vec<&str> = self
            .fields
            .iter()
            .filter(|(key, _)| {
                !entries
                    .iter()
                    .any(|(k, value)| k == key && value.is_valid)
            })
            .map(|(key, _)| key.as_str())
            .collect();
        if invalid.is_empty() {
            None
        } else {
            Some(format!("invalid fields: {}", invalid.join(", ")))
        }
    }

    /// Missing members decode from `null`, which yields their own
    /// "missing" diagnostics.
    pub(crate) fn decode(&self, tree: &FieldTree, raw: &Value) -> Result<FieldData, String> {
        let Value::Object(object) = raw else {
            return Err(decode_error("object", raw));
        };
        Ok(FieldData::Struct(
            self.fields
                .iter()
                .map(|(key, id)| {
                    let value = tree
                        .get(*id)
                        .transform_raw_value(object.get(key).unwrap_or(&Value::Null));
                    (key.clone(), value)
                })
                .collect(),
        ))
    }

    pub(crate) fn encode(&self, tree: &FieldTree, data: &FieldData) -> FieldResult<Expression> {
        let FieldData::Struct(_) = data else {
            return Err(mismatch("struct", data));
        };
        self.fields
            .iter()
            .map(|(key, id)| {
                let value = data
                    .struct_entry(key)
                    .ok_or_else(|| FieldError::InvalidValue(format!("missing field \"{key}\"")))?;
                Ok((key.clone(), tree.get(*id).transform_value_to_expression(value)?))
            })
            .collect::<FieldResult<Vec<_>>>()
            .map(Expression::Struct)
    }

    pub(crate) fn traverse<'t>(&self, tree: &'t FieldTree, path: &[KeySegment]) -> Option<FieldRef<'t>> {
        let (head, rest) = path.split_first()?;
        self.child(tree, &head.key_name())?.traverse(rest)
    }

    pub(crate) fn value_path(&self, tree: &FieldTree, path: &[KeySegment]) -> ValuePath {
        let Some((head, rest)) = path.split_first() else {
            return ValuePath::root();
        };
        let key = head.key_name();
        match self.child(tree, &key) {
            Some(child) => child
                .value_path_for_key_path(rest)
                .prefixed(ValuePathSegment::Struct {
                    key: key.into_owned(),
                }),
            None => ValuePath::root(),
        }
    }

    pub(crate) fn values<'v>(
        &self,
        tree: &FieldTree,
        data: &'v FieldData,
        path: &[KeySegment],
    ) -> Vec<&'v FieldValue> {
        let Some((head, rest)) = path.split_first() else {
            return Vec::new();
        };
        let key = head.key_name();
        match (self.child(tree, &key), data.struct_entry(&key)) {
            (Some(child), Some(value)) => child.values_for_key_path(value, rest),
            _ => Vec::new(),
        }
    }

    pub(crate) fn options(&self, tree: &FieldTree) -> FieldOptions {
        FieldOptions {
            fields: Some(
                self.fields
                    .iter()
                    .map(|(key, id)| (KeySegment::Key(key.clone()), tree.get(*id).options()))
                    .collect(),
            ),
            ..self.info.to_options(FieldKind::Struct)
        }
    }
}
