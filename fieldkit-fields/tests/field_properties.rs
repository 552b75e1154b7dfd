//! Property-based tests for field values.
//!
//! These tests verify properties that must hold for any input:
//! - Valid leaf values survive a decode/encode cycle unchanged
//! - Number validation agrees with the storage range
//! - 64-bit integers survive a decode/encode cycle exactly
//! - List edits keep the identity of untouched elements
//! - Derived labels and slugs are well formed

mod common;

use common::tree;
use fieldkit_fields::{convert_key_to_label, slugify, FieldData, FieldValue};
use fieldkit_model::Model;
use fieldkit_types::ElementId;
use proptest::prelude::*;
use serde_json::json;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-zA-Z0-9_]{0,20}").unwrap()
}

fn list_ids(value: &FieldValue) -> Vec<ElementId> {
    match &value.value {
        FieldData::List(items) => items.iter().map(|item| item.id).collect(),
        _ => Vec::new(),
    }
}

// =============================================================================
// LEAF PROPERTIES
// =============================================================================

mod leaf_properties {
    use super::*;

    proptest! {
        #[test]
        fn strings_roundtrip(s in ".{0,200}") {
            let tree = tree(&Model::String);
            let field = tree.root();
            let value = field.transform_raw_value(&json!(s));
            prop_assert!(value.is_valid);
            let encoded = field.transform_value_to_expression(&value).unwrap();
            prop_assert_eq!(encoded.to_raw(), json!(s));
        }

        #[test]
        fn int16_validity_matches_range(n in -100_000i64..100_000) {
            let tree = tree(&Model::Int16);
            let value = tree.root().transform_raw_value(&json!(n));
            let in_range = i64::from(i16::MIN) <= n && n <= i64::from(i16::MAX);
            prop_assert_eq!(value.is_valid, in_range);
            if in_range {
                let encoded = tree.root().transform_value_to_expression(&value).unwrap();
                prop_assert_eq!(encoded.to_raw(), json!(n));
            }
        }

        #[test]
        fn int64_roundtrips_exactly(n in any::<i64>()) {
            let tree = tree(&Model::Int64);
            let value = tree.root().transform_raw_value(&json!(n));
            prop_assert!(value.is_valid);
            let encoded = tree.root().transform_value_to_expression(&value).unwrap();
            prop_assert_eq!(encoded.to_raw(), json!(n));
        }

        #[test]
        fn uint64_roundtrips_exactly(n in any::<u64>()) {
            let tree = tree(&Model::Uint64);
            let value = tree.root().transform_raw_value(&json!(n));
            prop_assert!(value.is_valid);
            let encoded = tree.root().transform_value_to_expression(&value).unwrap();
            prop_assert_eq!(encoded.to_raw(), json!(n));
        }

        #[test]
        fn bools_roundtrip(b in any::<bool>()) {
            let tree = tree(&Model::Bool);
            let value = tree.root().transform_raw_value(&json!(b));
            let encoded = tree.root().transform_value_to_expression(&value).unwrap();
            prop_assert_eq!(encoded.to_raw(), json!(b));
        }
    }
}

// =============================================================================
// LIST PROPERTIES
// =============================================================================

mod list_properties {
    use super::*;

    proptest! {
        #[test]
        fn inserts_preserve_existing_ids(positions in prop::collection::vec(0usize..10, 1..20)) {
            let tree = tree(&Model::list(Model::Bool));
            let field = tree.root();
            let mut value = field.default_value();

            for position in positions {
                let before = list_ids(&value);
                let index = position.min(before.len());
                value = field.list_insert(&value, index);

                let mut after = list_ids(&value);
                prop_assert_eq!(after.len(), before.len() + 1);
                after.remove(index);
                prop_assert_eq!(after, before);
            }
        }

        #[test]
        fn moves_permute_ids(len in 1usize..10, from in 0usize..10, to in 0usize..10) {
            let tree = tree(&Model::list(Model::Bool));
            let field = tree.root();
            let mut value = field.default_value();
            for _ in 0..len {
                value = field.list_insert(&value, 0);
            }

            let mut before = list_ids(&value);
            let moved = field.list_move(&value, from % len, to % len);
            let mut after = list_ids(&moved);
            before.sort_by_key(|id| id.to_string());
            after.sort_by_key(|id| id.to_string());
            prop_assert_eq!(after, before);
        }
    }
}

// =============================================================================
// LABEL PROPERTIES
// =============================================================================

mod label_properties {
    use super::*;

    proptest! {
        #[test]
        fn labels_start_uppercase(key in key_strategy()) {
            let label = convert_key_to_label(&key);
            let first = label.chars().next().unwrap();
            prop_assert!(!first.is_lowercase());
            prop_assert!(!label.contains('_'));
        }

        #[test]
        fn slugs_are_url_safe(name in ".{0,60}") {
            let slug = slugify(&name);
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }
    }
}
