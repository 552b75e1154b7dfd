//! Initialized field trees and handles into them.

use crate::builder::FieldBuilder;
use crate::configuration::{Aggregates, FilterConfiguration, SortConfiguration};
use crate::error::{FieldError, FieldResult};
use crate::fields::{Field, FieldId, FieldInfo, LeafField};
use crate::registry::{FieldKind, FieldRegistry};
use crate::value::{FieldData, FieldValue};
use fieldkit_model::{FieldOptions, Model};
use fieldkit_types::{Expression, KeySegment, ValuePath};
use serde_json::Value;
use std::fmt;

/// An initialized, immutable field tree.
#[derive(Debug, Clone)]
pub struct FieldTree {
    nodes: Vec<Field>,
    aggregates: Vec<Aggregates>,
    root: FieldId,
}

impl FieldTree {
    pub(crate) fn new(nodes: Vec<Field>, aggregates: Vec<Aggregates>, root: FieldId) -> Self {
        Self {
            nodes,
            aggregates,
            root,
        }
    }

    /// Builds and initializes the tree for `model` in one go.
    pub fn from_model(model: &Model, options: Option<&FieldOptions>, registry: &FieldRegistry) -> Self {
        let mut builder = FieldBuilder::new(registry);
        let root = builder.create_field(model, options);
        builder.initialize(root)
    }

    pub fn root(&self) -> FieldRef<'_> {
        self.get(self.root)
    }

    /// Handle to node `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by the builder of this tree.
    pub fn get(&self, id: FieldId) -> FieldRef<'_> {
        assert!(id.0 < self.nodes.len(), "field {id} does not belong to this tree");
        FieldRef { tree: self, id }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Copyable handle to one node of a [`FieldTree`].
///
/// Two handles are equal when they point at the same node of the same
/// tree, which is how a resolved `recurse` is recognized as its bound
/// ancestor.
#[derive(Clone, Copy)]
pub struct FieldRef<'t> {
    pub(crate) tree: &'t FieldTree,
    pub(crate) id: FieldId,
}

impl PartialEq for FieldRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for FieldRef<'_> {}

impl fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .finish()
    }
}

impl<'t> FieldRef<'t> {
    pub fn id(self) -> FieldId {
        self.id
    }

    pub fn tree(self) -> &'t FieldTree {
        self.tree
    }

    pub fn field(self) -> &'t Field {
        &self.tree.nodes[self.id.0]
    }

    pub fn kind(self) -> FieldKind {
        self.field().kind()
    }

    pub fn type_tag(self) -> &'static str {
        self.kind().type_tag()
    }

    pub fn info(self) -> Option<&'t FieldInfo> {
        self.field().info()
    }

    pub fn label(self) -> Option<&'t str> {
        self.info().and_then(|info| info.label.as_deref())
    }

    pub fn description(self) -> Option<&'t str> {
        self.info().and_then(|info| info.description.as_deref())
    }

    /// The bound target of a `recurse` node; any other node is returned
    /// as is.
    pub fn resolved(self) -> FieldRef<'t> {
        match self.field() {
            Field::Recurse(recurse) => match recurse.target {
                Some(target) => self.tree.get(target),
                None => self,
            },
            _ => self,
        }
    }

    /// The concrete node this one behaves as: follows `recurse` targets,
    /// `recursive` tops and `recursion` children.
    ///
    /// A cycle made only of such nodes cannot be resolved and stops at the
    /// node where it was detected.
    pub fn effective(self) -> FieldRef<'t> {
        let mut current = self;
        for _ in 0..=self.tree.nodes.len() {
            let next = match current.field() {
                Field::Recurse(recurse) => recurse.target,
                Field::Recursive(recursive) => recursive.top_id(),
                Field::Recursion(recursion) => Some(recursion.field),
                _ => return current,
            };
            match next {
                Some(next) => current = self.tree.get(next),
                None => return current,
            }
        }
        current
    }

    /// Branch `key` of a union.
    pub fn branch(self, key: &str) -> Option<FieldRef<'t>> {
        let field = self.effective();
        match field.field() {
            Field::Union(f) => f.child(field.tree, key),
            _ => None,
        }
    }

    /// The wrapped child of an optional, list, set or map.
    pub fn inner(self) -> Option<FieldRef<'t>> {
        let field = self.effective();
        match field.field() {
            Field::Optional(f) => Some(f.child(field.tree)),
            Field::List(f) => Some(f.child(field.tree)),
            Field::Map(f) => Some(f.child(field.tree)),
            _ => None,
        }
    }

    // ── Values ───────────────────────────────────────────────────

    /// A fresh value for a new record.
    pub fn default_value(self) -> FieldValue {
        let field = self.effective();
        let data = match field.field() {
            Field::Struct(f) => f.default_data(field.tree),
            Field::Tuple(f) => f.default_data(field.tree),
            Field::Union(f) => f.default_data(field.tree),
            Field::Optional(f) => f.default_data(),
            Field::List(f) => f.default_data(),
            Field::Map(f) => f.default_data(),
            other => match other.as_leaf() {
                Some(leaf) => return leaf.default_value(),
                None => FieldData::Invalid(Value::Null),
            },
        };
        field.validated(data)
    }

    /// Validation message for `data`, or `None` when it is acceptable.
    pub fn validate(self, data: &FieldData) -> Option<String> {
        let field = self.effective();
        match field.field() {
            Field::Struct(f) => f.validate(data),
            Field::Tuple(f) => f.validate(data),
            Field::Union(f) => f.validate(data),
            Field::Optional(f) => f.validate(data),
            Field::List(f) => f.validate(data),
            Field::Map(f) => f.validate(data),
            other => match other.as_leaf() {
                Some(leaf) => leaf.validate(data),
                None => Some(unresolved_message(other)),
            },
        }
    }

    /// Wraps `data` with its validation outcome.
    pub fn validated(self, data: FieldData) -> FieldValue {
        let error = self.validate(&data);
        FieldValue::new(data, error)
    }

    /// Decodes a raw stored value. Input of the wrong shape is kept as
    /// [`FieldData::Invalid`] with the decode error attached.
    pub fn transform_raw_value(self, raw: &Value) -> FieldValue {
        let field = self.effective();
        let decoded = match field.field() {
            Field::Struct(f) => f.decode(field.tree, raw),
            Field::Tuple(f) => f.decode(field.tree, raw),
            Field::Union(f) => f.decode(field.tree, raw),
            Field::Optional(f) => f.decode(field.tree, raw),
            Field::List(f) => f.decode(field.tree, raw),
            Field::Map(f) => f.decode(field.tree, raw),
            other => match other.as_leaf() {
                Some(leaf) => return leaf.transform_raw_value(raw),
                None => Err(unresolved_message(other)),
            },
        };
        match decoded {
            Ok(data) => field.validated(data),
            Err(error) => FieldValue::new(FieldData::Invalid(raw.clone()), Some(error)),
        }
    }

    /// Encodes `value` into a data expression for the store.
    ///
    /// Fails when the value, or any part of it that would be persisted,
    /// is invalid.
    pub fn transform_value_to_expression(self, value: &FieldValue) -> FieldResult<Expression> {
        if !value.is_valid {
            return Err(FieldError::InvalidValue(
                value
                    .error
                    .clone()
                    .unwrap_or_else(|| format!("invalid {} value", self.type_tag())),
            ));
        }
        let field = self.effective();
        let data = &value.value;
        match field.field() {
            Field::Struct(f) => f.encode(field.tree, data),
            Field::Tuple(f) => f.encode(field.tree, data),
            Field::Union(f) => f.encode(field.tree, data),
            Field::Optional(f) => f.encode(field.tree, data),
            Field::List(f) => f.encode(field.tree, data),
            Field::Map(f) => f.encode(field.tree, data),
            other => match other.as_leaf() {
                Some(leaf) => leaf.encode(data),
                None => Err(FieldError::InvalidValue(unresolved_message(other))),
            },
        }
    }

    // ── Paths ────────────────────────────────────────────────────

    /// The field addressed by `key_path`, or `None` when a segment does not
    /// name a child.
    pub fn traverse(self, key_path: &[KeySegment]) -> Option<FieldRef<'t>> {
        if key_path.is_empty() {
            return Some(self);
        }
        let field = self.effective();
        let tree = field.tree;
        match field.field() {
            Field::Struct(f) => f.traverse(tree, key_path),
            Field::Tuple(f) => f.traverse(tree, key_path),
            Field::Union(f) => f.traverse(tree, key_path),
            Field::Optional(f) => f.traverse(tree, key_path),
            Field::List(f) => f.traverse(tree, key_path),
            Field::Map(f) => f.traverse(tree, key_path),
            _ => None,
        }
    }

    /// Translates a key path into a value path. Descent stops at the first
    /// segment that does not name a child.
    pub fn value_path_for_key_path(self, key_path: &[KeySegment]) -> ValuePath {
        if key_path.is_empty() {
            return ValuePath::root();
        }
        let field = self.effective();
        let tree = field.tree;
        match field.field() {
            Field::Struct(f) => f.value_path(tree, key_path),
            Field::Tuple(f) => f.value_path(tree, key_path),
            Field::Union(f) => f.value_path(tree, key_path),
            Field::Optional(f) => f.value_path(tree, key_path),
            Field::List(f) => f.value_path(tree, key_path),
            Field::Map(f) => f.value_path(tree, key_path),
            _ => ValuePath::root(),
        }
    }

    /// Every value `key_path` addresses inside `value`. Lists, sets and
    /// maps fan out over their elements; absent optionals and unselected
    /// union branches yield nothing.
    pub fn values_for_key_path<'v>(self, value: &'v FieldValue, key_path: &[KeySegment]) -> Vec<&'v FieldValue> {
        if key_path.is_empty() {
            return vec![value];
        }
        let field = self.effective();
        let tree = field.tree;
        let data = &value.value;
        match field.field() {
            Field::Struct(f) => f.values(tree, data, key_path),
            Field::Tuple(f) => f.values(tree, data, key_path),
            Field::Union(f) => f.values(tree, data, key_path),
            Field::Optional(f) => f.values(tree, data, key_path),
            Field::List(f) => f.values(tree, data, key_path),
            Field::Map(f) => f.values(tree, data, key_path),
            _ => Vec::new(),
        }
    }

    // ── Configuration ────────────────────────────────────────────

    pub fn sort_configurations(self) -> &'t [SortConfiguration] {
        &self.tree.aggregates[self.id.0].sort
    }

    pub fn filter_configurations(self) -> &'t [FilterConfiguration] {
        &self.tree.aggregates[self.id.0].filter
    }

    /// Options that rebuild this subtree. `recurse` nodes contribute
    /// nothing, so this terminates on recursive schemas.
    pub fn options(self) -> FieldOptions {
        let tree = self.tree;
        match self.field() {
            Field::Struct(f) => f.options(tree),
            Field::Tuple(f) => f.options(tree),
            Field::Union(f) => f.options(tree),
            Field::Optional(f) => f.options(tree),
            Field::List(f) => f.options(tree),
            Field::Map(f) => f.options(tree),
            Field::Recursive(f) => f.options(tree),
            Field::Recursion(f) => f.options(tree),
            Field::Recurse(_) => FieldOptions::default(),
            other => other
                .as_leaf()
                .map(|leaf| leaf.options())
                .unwrap_or_default(),
        }
    }
}

fn unresolved_message(field: &Field) -> String {
    format!("unresolved {} field", field.kind().type_tag())
}
