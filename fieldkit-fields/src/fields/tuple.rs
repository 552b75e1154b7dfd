use super::{decode_error, mismatch, mismatch_message, Field, FieldId, FieldInfo};
use crate::builder::FieldBuilder;
use crate::error::{FieldError, FieldResult};
use crate::registry::FieldKind;
use crate::tree::{FieldRef, FieldTree};
use crate::value::{FieldData, FieldValue};
use fieldkit_model::{FieldOptions, Model};
use fieldkit_types::{Expression, KeySegment, ValuePath, ValuePathSegment};
use serde_json::Value;

/// Fixed number of positional children.
#[derive(Debug, Clone, PartialEq)]
pub struct TupleField {
    pub info: FieldInfo,
    pub fields: Vec<FieldId>,
}

impl TupleField {
    pub(crate) fn create(
        builder: &mut FieldBuilder<'_>,
        model: &Model,
        options: Option<&FieldOptions>,
    ) -> FieldId {
        let Model::Tuple { fields } = model else {
            return builder.mismatch(FieldKind::Tuple, model);
        };
        let children = fields
            .iter()
            .enumerate()
            .map(|(index, child)| {
                let mut child_options = options
                    .and_then(|o| o.child(&KeySegment::Index(index)))
                    .cloned()
                    .unwrap_or_default();
                if child_options.label.is_none() {
                    child_options.label = options.and_then(|o| o.label.clone());
                }
                builder.create_field(child, Some(&child_options))
            })
            .collect();
        builder.push(Field::Tuple(Self {
            info: FieldInfo::from_options(options),
            fields: children,
        }))
    }

    pub fn child<'t>(&self, tree: &'t FieldTree, index: usize) -> Option<FieldRef<'t>> {
        self.fields.get(index).map(|id| tree.get(*id))
    }

    pub(crate) fn default_data(&self, tree: &FieldTree) -> FieldData {
        FieldData::Tuple(
            self.fields
                .iter()
                .map(|id| tree.get(*id).default_value())
                .collect(),
        )
    }

    pub(crate) fn validate(&self, data: &FieldData) -> Option<String> {
        let FieldData::Tuple(items) = data else {
            return Some(mismatch_message("tuple", data));
        };
        if items.len() != self.fields.len() {
            return Some(format!(
                "expected {} elements, got {}",
                self.fields.len(),
                items.len()
            ));
        }
        let invalid: Vec<String> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_valid)
            .map(|(index, _)| index.to_string())
            .collect();
        if invalid.is_empty() {
            None
        } else {
            Some(format!("invalid elements: {}", invalid.join(", ")))
        }
    }

    pub(crate) fn decode(&self, tree: &FieldTree, raw: &Value) -> Result<FieldData, String> {
        let Value::Array(items) = raw else {
            return Err(decode_error("array", raw));
        };
        Ok(FieldData::Tuple(
            self.fields
                .iter()
                .enumerate()
                .map(|(index, id)| {
                    tree.get(*id)
                        .transform_raw_value(items.get(index).unwrap_or(&Value::Null))
                })
                .collect(),
        ))
    }

    pub(crate) fn encode(&self, tree: &FieldTree, data: &FieldData) -> FieldResult<Expression> {
        let FieldData::Tuple(items) = data else {
            return Err(mismatch("tuple", data));
        };
        if items.len() != self.fields.len() {
            return Err(FieldError::InvalidValue(format!(
                "expected {} elements, got {}",
                self.fields.len(),
                items.len()
            )));
        }
        self.fields
            .iter()
            .zip(items)
            .map(|(id, item)| tree.get(*id).transform_value_to_expression(item))
            .collect::<FieldResult<Vec<_>>>()
            .map(Expression::Tuple)
    }

    pub(crate) fn traverse<'t>(&self, tree: &'t FieldTree, path: &[KeySegment]) -> Option<FieldRef<'t>> {
        let (head, rest) = path.split_first()?;
        self.child(tree, head.as_index()?)?.traverse(rest)
    }

    pub(crate) fn value_path(&self, tree: &FieldTree, path: &[KeySegment]) -> ValuePath {
        let Some((head, rest)) = path.split_first() else {
            return ValuePath::root();
        };
        match head.as_index().and_then(|index| Some((index, self.child(tree, index)?))) {
            Some((index, child)) => child
                .value_path_for_key_path(rest)
                .prefixed(ValuePathSegment::Tuple { index }),
            None => ValuePath::root(),
        }
    }

    pub(crate) fn values<'v>(
        &self,
        tree: &FieldTree,
        data: &'v FieldData,
        path: &[KeySegment],
    ) -> Vec<&'v FieldValue> {
        let (Some((head, rest)), FieldData::Tuple(items)) = (path.split_first(), data) else {
            return Vec::new();
        };
        let Some(index) = head.as_index() else {
            return Vec::new();
        };
        match (self.child(tree, index), items.get(index)) {
            (Some(child), Some(item)) => child.values_for_key_path(item, rest),
            _ => Vec::new(),
        }
    }

    pub(crate) fn options(&self, tree: &FieldTree) -> FieldOptions {
        FieldOptions {
            fields: Some(
                self.fields
                    .iter()
                    .enumerate()
                    .map(|(index, id)| (KeySegment::Index(index), tree.get(*id).options()))
                    .collect(),
            ),
            ..self.info.to_options(FieldKind::Tuple)
        }
    }
}
