use super::{decode_error, mismatch, mismatch_message, Field, FieldId, FieldInfo, LeafField};
use crate::builder::FieldBuilder;
use crate::configuration::{ConditionType, FilterConfiguration, SortConfiguration, SortType};
use crate::error::FieldResult;
use crate::registry::FieldKind;
use crate::value::FieldData;
use fieldkit_model::{FieldOptions, Model};
use fieldkit_types::Expression;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct BoolField {
    pub info: FieldInfo,
}

impl BoolField {
    pub(crate) fn create(
        builder: &mut FieldBuilder<'_>,
        model: &Model,
        options: Option<&FieldOptions>,
    ) -> FieldId {
        if !matches!(model, Model::Bool) {
            return builder.mismatch(FieldKind::Bool, model);
        }
        builder.push(Field::Bool(Self {
            info: FieldInfo::from_options(options),
        }))
    }
}

impl LeafField for BoolField {
    fn kind(&self) -> FieldKind {
        FieldKind::Bool
    }

    fn info(&self) -> &FieldInfo {
        &self.info
    }

    fn default_data(&self) -> FieldData {
        FieldData::Bool(false)
    }

    fn validate(&self, data: &FieldData) -> Option<String> {
        match data {
            FieldData::Bool(_) => None,
            other => Some(mismatch_message("bool", other)),
        }
    }

    fn decode(&self, raw: &Value) -> Result<FieldData, String> {
        raw.as_bool()
            .map(FieldData::Bool)
            .ok_or_else(|| decode_error("bool", raw))
    }

    fn encode(&self, data: &FieldData) -> FieldResult<Expression> {
        match data {
            FieldData::Bool(value) => Ok(Expression::Bool(*value)),
            other => Err(mismatch("bool", other)),
        }
    }

    fn sort_configurations(&self) -> Vec<SortConfiguration> {
        vec![SortConfiguration::leaf(
            "bool",
            self.info.label_or("Bool"),
            SortType::Bool,
        )]
    }

    fn filter_configurations(&self) -> Vec<FilterConfiguration> {
        vec![FilterConfiguration::leaf(
            "bool",
            self.info.label_or("Bool"),
            vec![ConditionType::BoolEqual],
        )]
    }
}
