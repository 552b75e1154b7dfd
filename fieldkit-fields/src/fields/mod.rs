//! Field variants.
//!
//! A [`Field`] is one node of a field tree. Nodes live in the tree's arena
//! and refer to their children by [`FieldId`], so the recursion variants can
//! point back at an ancestor without shared ownership. Leaf variants share
//! their behaviour through the [`LeafField`] trait; composites are driven
//! node by node from [`FieldRef`](crate::FieldRef).

mod boolean;
mod current_user;
mod date_time;
mod enumeration;
mod error;
mod list;
mod map;
mod media;
mod null;
mod number;
mod optional;
mod password;
mod recursion;
mod reference;
mod string;
mod structure;
mod tuple;
mod union;

pub use boolean::BoolField;
pub use current_user::CurrentUserField;
pub use date_time::DateTimeField;
pub use enumeration::EnumField;
pub use error::ErrorField;
pub use list::{Collection, ListField};
pub use map::MapField;
pub use media::{MediaField, MEDIA_ANNOTATION};
pub use null::NullField;
pub use number::{NumberField, NumberStorage};
pub use optional::OptionalField;
pub use password::PasswordField;
pub use recursion::{RecurseField, RecursionField, RecursiveField};
pub use reference::RefField;
pub use string::StringField;
pub use structure::StructField;
pub use tuple::TupleField;
pub use union::UnionField;

use crate::configuration::{FilterConfiguration, SortConfiguration};
use crate::error::{FieldError, FieldResult};
use crate::registry::FieldKind;
use crate::value::{json_type_name, FieldData, FieldValue};
use fieldkit_model::FieldOptions;
use fieldkit_types::{Expression, ValuePathSegment};
use serde_json::Value;
use std::fmt;

/// Index of a field in its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub(crate) usize);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Label and description shared by every configurable variant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldInfo {
    pub label: Option<String>,
    pub description: Option<String>,
}

impl FieldInfo {
    pub(crate) fn from_options(options: Option<&FieldOptions>) -> Self {
        Self {
            label: options.and_then(|o| o.label.clone()),
            description: options.and_then(|o| o.description.clone()),
        }
    }

    /// Options carrying the explicit type tag plus label and description.
    pub(crate) fn to_options(&self, kind: FieldKind) -> FieldOptions {
        FieldOptions {
            field_type: Some(kind.type_tag().to_string()),
            label: self.label.clone(),
            description: self.description.clone(),
            ..FieldOptions::default()
        }
    }

    pub(crate) fn label_or(&self, fallback: &str) -> String {
        self.label.clone().unwrap_or_else(|| fallback.to_string())
    }
}

/// Options for a wrapped child: the configured ones, with the parent's
/// label filled in when the child has none.
pub(crate) fn inherited_options(options: Option<&FieldOptions>) -> FieldOptions {
    let mut child = options
        .and_then(FieldOptions::inner)
        .cloned()
        .unwrap_or_default();
    if child.label.is_none() {
        child.label = options.and_then(|o| o.label.clone());
    }
    child
}

/// Options for a keyed child with a label derived from the key when none is
/// configured.
pub(crate) fn keyed_options(options: Option<&FieldOptions>, key: &str) -> FieldOptions {
    let mut child = options
        .and_then(|o| o.child_by_key(key))
        .cloned()
        .unwrap_or_default();
    if child.label.is_none() {
        child.label = Some(crate::label::convert_key_to_label(key));
    }
    child
}

/// Orders keyed schema members: keys listed in the options first, in
/// listed order, then the remaining members in schema order.
pub(crate) fn ordered_members<'m, T>(
    members: &'m [(String, T)],
    options: Option<&FieldOptions>,
) -> Vec<&'m (String, T)> {
    let listed: Vec<&str> = options
        .and_then(|o| o.fields.as_ref())
        .map(|fields| fields.iter().filter_map(|(k, _)| k.as_key()).collect())
        .unwrap_or_default();

    let mut ordered: Vec<&(String, T)> = listed
        .iter()
        .filter_map(|key| members.iter().find(|(k, _)| k == key))
        .collect();
    ordered.extend(members.iter().filter(|(k, _)| !listed.contains(&k.as_str())));
    ordered
}

/// Message for data whose shape does not belong to the field.
pub(crate) fn mismatch_message(expected: &str, data: &FieldData) -> String {
    format!("expected {expected} value, got {}", data.kind_name())
}

pub(crate) fn mismatch(expected: &'static str, data: &FieldData) -> FieldError {
    FieldError::ValueMismatch {
        expected,
        actual: data.kind_name(),
    }
}

pub(crate) fn decode_error(expected: &str, raw: &Value) -> String {
    format!("expected {expected}, got {}", json_type_name(raw))
}

/// Behaviour shared by the leaf variants.
pub trait LeafField {
    fn kind(&self) -> FieldKind;

    fn info(&self) -> &FieldInfo;

    fn default_data(&self) -> FieldData;

    /// Returns an error message when `data` is not acceptable.
    fn validate(&self, data: &FieldData) -> Option<String>;

    /// Decodes a raw stored value.
    fn decode(&self, raw: &Value) -> Result<FieldData, String>;

    fn encode(&self, data: &FieldData) -> FieldResult<Expression>;

    fn sort_configurations(&self) -> Vec<SortConfiguration> {
        Vec::new()
    }

    fn filter_configurations(&self) -> Vec<FilterConfiguration> {
        Vec::new()
    }

    fn options(&self) -> FieldOptions {
        self.info().to_options(self.kind())
    }

    /// Validated default value.
    fn default_value(&self) -> FieldValue {
        let data = self.default_data();
        let error = self.validate(&data);
        FieldValue::new(data, error)
    }

    /// Decodes `raw`, keeping undecodable input as [`FieldData::Invalid`].
    fn transform_raw_value(&self, raw: &Value) -> FieldValue {
        match self.decode(raw) {
            Ok(data) => {
                let error = self.validate(&data);
                FieldValue::new(data, error)
            }
            Err(error) => FieldValue::new(FieldData::Invalid(raw.clone()), Some(error)),
        }
    }
}

/// One node of a field tree.
#[derive(Debug, Clone)]
pub enum Field {
    String(StringField),
    Bool(BoolField),
    Number(NumberField),
    DateTime(DateTimeField),
    Enum(EnumField),
    Null(NullField),
    CurrentUser(CurrentUserField),
    Ref(RefField),
    Password(PasswordField),
    Media(MediaField),
    Error(ErrorField),
    Struct(StructField),
    Tuple(TupleField),
    Union(UnionField),
    Optional(OptionalField),
    List(ListField),
    Map(MapField),
    Recursive(RecursiveField),
    Recursion(RecursionField),
    Recurse(RecurseField),
}

impl Field {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::String(_) => FieldKind::String,
            Self::Bool(_) => FieldKind::Bool,
            Self::Number(_) => FieldKind::Number,
            Self::DateTime(_) => FieldKind::DateTime,
            Self::Enum(_) => FieldKind::Enum,
            Self::Null(_) => FieldKind::Null,
            Self::CurrentUser(_) => FieldKind::CurrentUser,
            Self::Ref(_) => FieldKind::Ref,
            Self::Password(_) => FieldKind::Password,
            Self::Media(_) => FieldKind::Media,
            Self::Error(_) => FieldKind::Error,
            Self::Struct(_) => FieldKind::Struct,
            Self::Tuple(_) => FieldKind::Tuple,
            Self::Union(_) => FieldKind::Union,
            Self::Optional(_) => FieldKind::Optional,
            Self::List(f) => match f.collection {
                Collection::List => FieldKind::List,
                Collection::Set => FieldKind::Set,
            },
            Self::Map(_) => FieldKind::Map,
            Self::Recursive(_) => FieldKind::Recursive,
            Self::Recursion(_) => FieldKind::Recursion,
            Self::Recurse(_) => FieldKind::Recurse,
        }
    }

    /// The shared leaf behaviour, if this is a leaf.
    pub fn as_leaf(&self) -> Option<&dyn LeafField> {
        let leaf: &dyn LeafField = match self {
            Self::String(f) => f,
            Self::Bool(f) => f,
            Self::Number(f) => f,
            Self::DateTime(f) => f,
            Self::Enum(f) => f,
            Self::Null(f) => f,
            Self::CurrentUser(f) => f,
            Self::Ref(f) => f,
            Self::Password(f) => f,
            Self::Media(f) => f,
            Self::Error(f) => f,
            _ => return None,
        };
        Some(leaf)
    }

    pub fn info(&self) -> Option<&FieldInfo> {
        match self {
            Self::Struct(f) => Some(&f.info),
            Self::Tuple(f) => Some(&f.info),
            Self::Union(f) => Some(&f.info),
            Self::Optional(f) => Some(&f.info),
            Self::List(f) => Some(&f.info),
            Self::Map(f) => Some(&f.info),
            Self::Recursive(f) => Some(&f.info),
            Self::Recursion(f) => Some(&f.info),
            Self::Recurse(_) => None,
            leaf => leaf.as_leaf().map(|leaf| leaf.info()),
        }
    }

    /// Direct children with the id prefix and value-path segment their
    /// configurations are re-exported under.
    pub(crate) fn children(&self) -> Vec<ChildEntry> {
        match self {
            Self::Struct(f) => f
                .fields
                .iter()
                .map(|(key, id)| ChildEntry {
                    id: *id,
                    prefix: key.clone(),
                    segment: ValuePathSegment::Struct { key: key.clone() },
                    sortable: true,
                })
                .collect(),
            Self::Tuple(f) => f
                .fields
                .iter()
                .enumerate()
                .map(|(index, id)| ChildEntry {
                    id: *id,
                    prefix: index.to_string(),
                    segment: ValuePathSegment::Tuple { index },
                    sortable: true,
                })
                .collect(),
            Self::Union(f) => f
                .fields
                .iter()
                .map(|(key, id)| ChildEntry {
                    id: *id,
                    prefix: format!("union[{key}]"),
                    segment: ValuePathSegment::Union { key: key.clone() },
                    sortable: true,
                })
                .collect(),
            Self::Optional(f) => vec![ChildEntry {
                id: f.field,
                prefix: "optional".to_string(),
                segment: ValuePathSegment::Optional,
                sortable: true,
            }],
            Self::List(f) => vec![ChildEntry {
                id: f.field,
                prefix: "list".to_string(),
                segment: ValuePathSegment::List,
                sortable: false,
            }],
            Self::Map(f) => vec![ChildEntry {
                id: f.field,
                prefix: "map".to_string(),
                segment: ValuePathSegment::Map,
                sortable: false,
            }],
            _ => Vec::new(),
        }
    }
}

/// A composite's child as seen by configuration aggregation.
#[derive(Debug, Clone)]
pub(crate) struct ChildEntry {
    pub id: FieldId,
    pub prefix: String,
    pub segment: ValuePathSegment,
    /// Multi-valued containers cannot be sorted by their elements.
    pub sortable: bool,
}
