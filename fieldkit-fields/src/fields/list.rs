use super::{decode_error, inherited_options, mismatch, mismatch_message, Field, FieldId, FieldInfo};
use crate::builder::FieldBuilder;
use crate::error::FieldResult;
use crate::registry::FieldKind;
use crate::tree::{FieldRef, FieldTree};
use crate::value::{FieldData, FieldValue, ListItem};
use fieldkit_model::{FieldOptions, Model};
use fieldkit_types::{Expression, KeySegment, ValuePath, ValuePathSegment};
use serde_json::Value;

/// Whether a [`ListField`] persists as an ordered list or a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    List,
    Set,
}

/// Variable number of elements sharing one child field.
///
/// Every element carries an [`ElementId`](fieldkit_types::ElementId) that
/// survives inserts, removals and moves of its siblings.
#[derive(Debug, Clone, PartialEq)]
pub struct ListField {
    pub info: FieldInfo,
    pub field: FieldId,
    pub collection: Collection,
}

impl ListField {
    pub(crate) fn create(
        builder: &mut FieldBuilder<'_>,
        model: &Model,
        options: Option<&FieldOptions>,
    ) -> FieldId {
        let (inner, collection) = match model {
            Model::List { model } => (model, Collection::List),
            Model::Set { model } => (model, Collection::Set),
            other => return builder.mismatch(FieldKind::List, other),
        };
        let child_options = inherited_options(options);
        let field = builder.create_field(inner, Some(&child_options));
        builder.push(Field::List(Self {
            info: FieldInfo::from_options(options),
            field,
            collection,
        }))
    }

    pub fn child<'t>(&self, tree: &'t FieldTree) -> FieldRef<'t> {
        tree.get(self.field)
    }

    fn kind(&self) -> FieldKind {
        match self.collection {
            Collection::List => FieldKind::List,
            Collection::Set => FieldKind::Set,
        }
    }

    pub(crate) fn default_data(&self) -> FieldData {
        FieldData::List(Vec::new())
    }

    pub(crate) fn validate(&self, data: &FieldData) -> Option<String> {
        let FieldData::List(items) = data else {
            return Some(mismatch_message(self.kind().type_tag(), data));
        };
        let invalid: Vec<String> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.value.is_valid)
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
        let child = self.child(tree);
        Ok(FieldData::List(
            items
                .iter()
                .map(|item| ListItem::new(child.transform_raw_value(item)))
                .collect(),
        ))
    }

    pub(crate) fn encode(&self, tree: &FieldTree, data: &FieldData) -> FieldResult<Expression> {
        let FieldData::List(items) = data else {
            return Err(mismatch(self.kind().type_tag(), data));
        };
        let child = self.child(tree);
        let encoded = items
            .iter()
            .map(|item| child.transform_value_to_expression(&item.value))
            .collect::<FieldResult<Vec<_>>>()?;
        Ok(match self.collection {
            Collection::List => Expression::List(encoded),
            Collection::Set => Expression::Set(encoded),
        })
    }

    /// The head segment selects an element and is consumed whatever it is.
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
            .prefixed(ValuePathSegment::List)
    }

    /// Fans out over every element.
    pub(crate) fn values<'v>(
        &self,
        tree: &FieldTree,
        data: &'v FieldData,
        path: &[KeySegment],
    ) -> Vec<&'v FieldValue> {
        let (Some((_, rest)), FieldData::List(items)) = (path.split_first(), data) else {
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
            ..self.info.to_options(self.kind())
        }
    }
}
