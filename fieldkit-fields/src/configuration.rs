//! Sort and filter configurations aggregated from the field tree.
//!
//! Leaves declare what they can be sorted and filtered by; composites
//! re-export their children's configurations with the child's id segment
//! and value-path segment prepended. A renderer offers the root's list as
//! the sort and filter menu of a record list.

use fieldkit_model::EnumOption;
use fieldkit_types::{ValuePath, ValuePathSegment};
use serde::{Deserialize, Serialize};

/// Value domain a sort compares in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortType {
    String,
    Number,
    Date,
    Bool,
}

/// Filter condition a leaf supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionType {
    StringEqual,
    StringIncludes,
    StringStartsWith,
    StringEndsWith,
    StringRegex,
    NumberEqual,
    NumberMin,
    NumberMax,
    DateEqual,
    DateMin,
    DateMax,
    BoolEqual,
    EnumEqual,
    RefEqual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortConfiguration {
    /// Dotted id, unique within the root's list.
    pub key: String,
    pub label: String,
    pub sort_type: SortType,
    pub path: ValuePath,
}

impl SortConfiguration {
    pub(crate) fn leaf(key: &str, label: impl Into<String>, sort_type: SortType) -> Self {
        Self {
            key: key.to_string(),
            label: label.into(),
            sort_type,
            path: ValuePath::root(),
        }
    }

    pub(crate) fn prefixed(&self, prefix: &str, segment: &ValuePathSegment) -> Self {
        Self {
            key: format!("{prefix}.{}", self.key),
            label: self.label.clone(),
            sort_type: self.sort_type,
            path: self.path.prefixed(segment.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfiguration {
    /// Dotted id, unique within the root's list.
    pub id: String,
    pub label: String,
    pub conditions: Vec<ConditionType>,
    pub path: ValuePath,
    /// Selectable values for enum filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<EnumOption>>,
}

impl FilterConfiguration {
    pub(crate) fn leaf(id: &str, label: impl Into<String>, conditions: Vec<ConditionType>) -> Self {
        Self {
            id: id.to_string(),
            label: label.into(),
            conditions,
            path: ValuePath::root(),
            options: None,
        }
    }

    pub(crate) fn prefixed(&self, prefix: &str, segment: &ValuePathSegment) -> Self {
        Self {
            id: format!("{prefix}.{}", self.id),
            label: self.label.clone(),
            conditions: self.conditions.clone(),
            path: self.path.prefixed(segment.clone()),
            options: self.options.clone(),
        }
    }
}

/// Sort and filter configurations computed for one field during
/// initialization.
#[derive(Debug, Clone, Default)]
pub(crate) struct Aggregates {
    pub sort: Vec<SortConfiguration>,
    pub filter: Vec<FilterConfiguration>,
}
