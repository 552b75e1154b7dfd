use super::{decode_error, inherited_options, mismatch, mismatch_message, Field, FieldId, FieldInfo};
use crate::builder::FieldBuilder;
use crate::error::{FieldError, FieldResult};
use crate::registry::FieldKind;
use crate::tree::{FieldRef, FieldTree};
use crate::value::{FieldData, FieldValue, MapItem};
use fieldkit_model::{FieldOptions, Model};
use fieldkit_types::{Expression, KeySegment, ValuePath, ValuePathSegment};
use serde_json::Value;
use std::collections::HashSet;

/// Entries with user-chosen string keys sharing one child field.
#[derive(Debug, Clone, PartialEq)]
pub struct MapField {
    pub info: FieldInfo,
    pub field: FieldId,
    /// Closed set of permitted keys, if any.
    pub restricted_to_keys: Option<Vec<String>>,
}

impl MapField {
    pub(crate) fn create(
        builder: &mut FieldBuilder<'_>,
        model: &Model,
        options: Option<&FieldOptions>,
    ) -> FieldId {
        let Model::Map { model: inner } = model else {
            return builder.mismatch(FieldKind::Map, model);
        };
        let child_options = inherited_options(options);
        let field = builder.create_field(inner, Some(&child_options));
        builder.push(Field::Map(Self {
            info: FieldInfo::from_options(options),
            field,
            restricted_to_keys: options.and_then(|o| o.restricted_to_keys.clone()),
        }))
    }

    pub fn child<'t>(&self, tree: &'t FieldTree) -> FieldRef<'t> {
        tree.get(self.field)
    }

    pub(crate) fn default_data(&self) -> FieldData {
        FieldData::Map(Vec::new())
    }

    pub(crate) fn validate(&self, data: &FieldData) -> Option<String> {
        let FieldData::Map(items) = data else {
            return Some(mismatch_message("map", data));
        };
        let mut seen = HashSet::with_capacity(items.len());
        for item in items {
            if item.key.is_empty() {
                return Some("keys must not be empty".to_string());
            }
            if !seen.insert(item.key.as_str()) {
                return Some(format!("duplicate key \"{}\"", item.key));
            }
            if let Some(allowed) = &self.restricted_to_keys {
                if !allowed.contains(&item.key) {
                    return Some(format!("\"{}\" is not a permitted key", item.key));
                }
            }
            if !item.value.is_valid {
                return Some(format!("\"{}\" is invalid", item.key));
            }
        }
        None
    }

    pub(crate) fn decode(&self, tree: &FieldTree, raw: &Value) -> Result<FieldData, String> {
        let Value::Object(object) = raw else {
            return Err(decode_error("object", raw));
        };
        let child = self.child(tree);
        Ok(FieldData::Map(
            object
                .iter()
                .map(|(key, value)| MapItem::new(key.clone(), child.transform_raw_value(value)))
                .collect(),
        ))
    }

    pub(crate) fn encode(&self, tree: &FieldTree, data: &FieldData) -> FieldResult<Expression> {
        let FieldData::Map(items) = data else {
            return Err(mismatch("map", data));
        };
        if let Some(error) = self.validate(data) {
            return Err(FieldError::InvalidValue(error));
        }
        let child = self.child(tree);
        items
            .iter()
            .map(|item| Ok((item.key.clone(), child.transform_value_to_expression(&item.value)?)))
            .collect::<FieldResult<Vec<_>>>()
            .map(Expression::Map)
    }

    pub(crate) fn traverse<'t>(&self, tree: &'t FieldTree, path: &[KeySegment]) -> Option<FieldRef<'t>> {
        let (_, rest) = path.split_first()?;
        self.child(tree).traverse(rest)
    }

    pub(crate) fn value_path(&self, tree: &FieldTree, path: &[KeySegment]) -> ValuePath {
        let Some((_, rest)) = path.split_first() else {
            return ValuePath::root();
        };
        self.child(tree)
            .value_path_for_key_path(rest)
            .prefixed(ValuePathSegment::Map)
    }

    pub(crate) fn values<'v>(
        &self,
        tree: &FieldTree,
        data: &'v FieldData,
        path: &[KeySegment],
    ) -> Vec<&'v FieldValue> {
        let (Some((_, rest)), FieldData::Map(items)) = (path.split_first(), data) else {
            return Vec::new();
        };
        let child = self.child(tree);
        items
            .iter()
            .flat_map(|item| child.values_for_key_path(&item.value, rest))
            .collect()
    }

    pub(crate) fn options(&self, tree: &FieldTree) -> FieldOptions {
        FieldOptions {
            field: Some(Box::new(self.child(tree).options())),
            restricted_to_keys: self.restricted_to_keys.clone(),
            ..self.info.to_options(FieldKind::Map)
        }
    }
}
