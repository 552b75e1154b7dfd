use super::{decode_error, keyed_options, mismatch, mismatch_message, ordered_members, Field, FieldId, FieldInfo};
use crate::builder::FieldBuilder;
use crate::error::{FieldError, FieldResult};
use crate::registry::FieldKind;
use crate::tree::{FieldRef, FieldTree};
use crate::value::{FieldData, FieldValue, UnionValue};
use fieldkit_model::{FieldOptions, Model};
use fieldkit_types::{Expression, KeySegment, ValuePath, ValuePathSegment};
use serde_json::Value;

/// Choice of exactly one named branch.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionField {
    pub info: FieldInfo,
    /// Branches in display order.
    pub fields: Vec<(String, FieldId)>,
}

impl UnionField {
    pub(crate) fn create(
        builder: &mut FieldBuilder<'_>,
        model: &Model,
        options: Option<&FieldOptions>,
    ) -> FieldId {
        let Model::Union { fields } = model else {
            return builder.mismatch(FieldKind::Union, model);
        };
        let children = ordered_members(fields, options)
            .into_iter()
            .map(|(key, child)| {
                let child_options = keyed_options(options, key);
                (key.clone(), builder.create_field(child, Some(&child_options)))
            })
            .collect();
        builder.push(Field::Union(Self {
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

    /// The first branch, selected with its default value.
    pub(crate) fn default_data(&self, tree: &FieldTree) -> FieldData {
        let Some((key, id)) = self.fields.first() else {
            return FieldData::Union(UnionValue::default());
        };
        FieldData::Union(UnionValue {
            selected: Some(key.clone()),
            values: vec![(key.clone(), tree.get(*id).default_value())],
        })
    }

    pub(crate) fn validate(&self, data: &FieldData) -> Option<String> {
        let FieldData::Union(union) = data else {
            return Some(mismatch_message("union", data));
        };
        let Some(key) = union.selected.as_deref() else {
            return Some("no option selected".to_string());
        };
        if !self.fields.iter().any(|(k, _)| k == key) {
            return Some(format!("\"{key}\" is not an option"));
        }
        match union.get(key) {
            Some(value) if value.is_valid => None,
            Some(_) => Some(format!("\"{key}\" is invalid")),
            None => Some(format!("\"{key}\" has no value")),
        }
    }

    /// Expects a single-key object naming the selected branch.
    pub(crate) fn decode(&self, tree: &FieldTree, raw: &Value) -> Result<FieldData, String> {
        let Value::Object(object) = raw else {
            return Err(decode_error("single-key object", raw));
        };
        let mut entries = object.iter();
        let (Some((key, raw_value)), None) = (entries.next(), entries.next()) else {
            return Err(format!("expected exactly one key, got {}", object.len()));
        };
        let child = self
            .child(tree, key)
            .ok_or_else(|| format!("\"{key}\" is not an option"))?;
        Ok(FieldData::Union(UnionValue {
            selected: Some(key.clone()),
            values: vec![(key.clone(), child.transform_raw_value(raw_value))],
        }))
    }

    pub(crate) fn encode(&self, tree: &FieldTree, data: &FieldData) -> FieldResult<Expression> {
        let FieldData::Union(union) = data else {
            return Err(mismatch("union", data));
        };
        let (key, value) = union
            .selected_value()
            .ok_or_else(|| FieldError::InvalidValue("no option selected".to_string()))?;
        let child = self
            .child(tree, key)
            .ok_or_else(|| FieldError::InvalidValue(format!("\"{key}\" is not an option")))?;
        Ok(Expression::union(key, child.transform_value_to_expression(value)?))
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
                .prefixed(ValuePathSegment::Union {
                    key: key.into_owned(),
                }),
            None => ValuePath::root(),
        }
    }

    /// Only the selected branch yields values.
    pub(crate) fn values<'v>(
        &self,
        tree: &FieldTree,
        data: &'v FieldData,
        path: &[KeySegment],
    ) -> Vec<&'v FieldValue> {
        let (Some((head, rest)), FieldData::Union(union)) = (path.split_first(), data) else {
            return Vec::new();
        };
        let key = head.key_name();
        match union.selected_value() {
            Some((selected, value)) if key == selected => self
                .child(tree, &key)
                .map(|child| child.values_for_key_path(value, rest))
                .unwrap_or_default(),
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
            ..self.info.to_options(FieldKind::Union)
        }
    }
}
