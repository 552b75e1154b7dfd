//! Pure value edits.
//!
//! Every edit takes the current value and returns the next one, flagged as
//! changed and re-validated by the field it belongs to. An edit whose
//! target does not exist (unknown key, index out of range, data of the
//! wrong shape) returns an unchanged clone.

use crate::tree::FieldRef;
use crate::value::{FieldData, FieldValue, ListItem, MapItem, OptionalValue, UnionValue};

impl FieldRef<'_> {
    /// Replaces the data wholesale.
    pub fn update(self, data: FieldData) -> FieldValue {
        self.validated(data).changed()
    }

    /// Discards the value in favour of a fresh default.
    pub fn reset(self) -> FieldValue {
        self.default_value().changed()
    }

    pub fn struct_set(self, value: &FieldValue, key: &str, child: FieldValue) -> FieldValue {
        let FieldData::Struct(entries) = &value.value else {
            return value.clone();
        };
        let Some(position) = entries.iter().position(|(k, _)| k == key) else {
            return value.clone();
        };
        let mut entries = entries.clone();
        entries[position].1 = child;
        self.update(FieldData::Struct(entries))
    }

    pub fn tuple_set(self, value: &FieldValue, index: usize, child: FieldValue) -> FieldValue {
        let FieldData::Tuple(items) = &value.value else {
            return value.clone();
        };
        if index >= items.len() {
            return value.clone();
        }
        let mut items = items.clone();
        items[index] = child;
        self.update(FieldData::Tuple(items))
    }

    /// Selects branch `key`, materializing its default on first selection.
    /// Values of other branches are kept.
    pub fn union_select(self, value: &FieldValue, key: &str) -> FieldValue {
        let (Some(branch), FieldData::Union(union)) = (self.branch(key), &value.value) else {
            return value.clone();
        };
        let mut union = union.clone();
        if union.get(key).is_none() {
            union.values.push((key.to_string(), branch.default_value()));
        }
        union.selected = Some(key.to_string());
        self.update(FieldData::Union(union))
    }

    /// Replaces the retained value of branch `key` without changing the
    /// selection.
    pub fn union_set_value(self, value: &FieldValue, key: &str, child: FieldValue) -> FieldValue {
        let (Some(_), FieldData::Union(union)) = (self.branch(key), &value.value) else {
            return value.clone();
        };
        let mut values: Vec<(String, FieldValue)> = union
            .values
            .iter()
            .filter(|(k, _)| k != key)
            .cloned()
            .collect();
        values.push((key.to_string(), child));
        self.update(FieldData::Union(UnionValue {
            selected: union.selected.clone(),
            values,
        }))
    }

    /// Switches presence. The inner value is materialized on first
    /// presence and retained while absent.
    pub fn optional_set_present(self, value: &FieldValue, is_present: bool) -> FieldValue {
        let (Some(inner), FieldData::Optional(optional)) = (self.inner(), &value.value) else {
            return value.clone();
        };
        let inner_value = match &optional.value {
            Some(existing) => existing.clone(),
            None if is_present => Box::new(inner.default_value()),
            None => return self.update(FieldData::Optional(OptionalValue::default())),
        };
        self.update(FieldData::Optional(OptionalValue {
            is_present,
            value: Some(inner_value),
        }))
    }

    /// Sets the inner value and marks the optional present.
    pub fn optional_set_value(self, value: &FieldValue, child: FieldValue) -> FieldValue {
        if !matches!(value.value, FieldData::Optional(_)) || self.inner().is_none() {
            return value.clone();
        }
        self.update(FieldData::Optional(OptionalValue {
            is_present: true,
            value: Some(Box::new(child)),
        }))
    }

    /// Inserts a default element at `index` (`index == len` appends).
    pub fn list_insert(self, value: &FieldValue, index: usize) -> FieldValue {
        match self.inner() {
            Some(element) => self.list_insert_value(value, index, element.default_value()),
            None => value.clone(),
        }
    }

    pub fn list_insert_value(self, value: &FieldValue, index: usize, child: FieldValue) -> FieldValue {
        let FieldData::List(items) = &value.value else {
            return value.clone();
        };
        if index > items.len() {
            return value.clone();
        }
        let mut items = items.clone();
        items.insert(index, ListItem::new(child));
        self.update(FieldData::List(items))
    }

    pub fn list_remove(self, value: &FieldValue, index: usize) -> FieldValue {
        let FieldData::List(items) = &value.value else {
            return value.clone();
        };
        if index >= items.len() {
            return value.clone();
        }
        let mut items = items.clone();
        items.remove(index);
        self.update(FieldData::List(items))
    }

    /// Moves the element at `from` so it ends up at `to`; ids travel with
    /// their elements.
    pub fn list_move(self, value: &FieldValue, from: usize, to: usize) -> FieldValue {
        let FieldData::List(items) = &value.value else {
            return value.clone();
        };
        if from >= items.len() || to >= items.len() {
            return value.clone();
        }
        let mut items = items.clone();
        let item = items.remove(from);
        items.insert(to, item);
        self.update(FieldData::List(items))
    }

    pub fn list_set(self, value: &FieldValue, index: usize, child: FieldValue) -> FieldValue {
        let FieldData::List(items) = &value.value else {
            return value.clone();
        };
        if index >= items.len() {
            return value.clone();
        }
        let mut items = items.clone();
        items[index].value = child;
        self.update(FieldData::List(items))
    }

    /// Inserts an entry with a default value under `key`.
    pub fn map_insert(self, value: &FieldValue, index: usize, key: &str) -> FieldValue {
        let Some(element) = self.inner() else {
            return value.clone();
        };
        let FieldData::Map(items) = &value.value else {
            return value.clone();
        };
        if index > items.len() {
            return value.clone();
        }
        let mut items = items.clone();
        items.insert(index, MapItem::new(key, element.default_value()));
        self.update(FieldData::Map(items))
    }

    pub fn map_remove(self, value: &FieldValue, index: usize) -> FieldValue {
        let FieldData::Map(items) = &value.value else {
            return value.clone();
        };
        if index >= items.len() {
            return value.clone();
        }
        let mut items = items.clone();
        items.remove(index);
        self.update(FieldData::Map(items))
    }

    pub fn map_move(self, value: &FieldValue, from: usize, to: usize) -> FieldValue {
        let FieldData::Map(items) = &value.value else {
            return value.clone();
        };
        if from >= items.len() || to >= items.len() {
            return value.clone();
        }
        let mut items = items.clone();
        let item = items.remove(from);
        items.insert(to, item);
        self.update(FieldData::Map(items))
    }

    /// Renames an entry. Duplicate or empty keys are accepted here and
    /// reported by validation.
    pub fn map_set_key(self, value: &FieldValue, index: usize, key: &str) -> FieldValue {
        let FieldData::Map(items) = &value.value else {
            return value.clone();
        };
        if index >= items.len() {
            return value.clone();
        }
        let mut items = items.clone();
        items[index].key = key.to_string();
        self.update(FieldData::Map(items))
    }

    pub fn map_set_value(self, value: &FieldValue, index: usize, child: FieldValue) -> FieldValue {
        let FieldData::Map(items) = &value.value else {
            return value.clone();
        };
        if index >= items.len() {
            return value.clone();
        }
        let mut items = items.clone();
        items[index].value = child;
        self.update(FieldData::Map(items))
    }
}
