use super::{decode_error, mismatch, mismatch_message, Field, FieldId, FieldInfo, LeafField};
use crate::builder::FieldBuilder;
use crate::configuration::{ConditionType, FilterConfiguration, SortConfiguration, SortType};
use crate::error::FieldResult;
use crate::registry::FieldKind;
use crate::value::FieldData;
use fieldkit_model::{FieldOptions, Model};
use fieldkit_types::Expression;
use serde_json::Value;

/// Free text with optional length bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct StringField {
    pub info: FieldInfo,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    /// Rendering hint for a multi-line input.
    pub multiline: bool,
}

impl StringField {
    pub(crate) fn create(
        builder: &mut FieldBuilder<'_>,
        model: &Model,
        options: Option<&FieldOptions>,
    ) -> FieldId {
        if !matches!(model, Model::String) {
            return builder.mismatch(FieldKind::String, model);
        }
        builder.push(Field::String(Self {
            info: FieldInfo::from_options(options),
            min_length: options.and_then(|o| o.min_length),
            max_length: options.and_then(|o| o.max_length),
            multiline: options.and_then(|o| o.multiline).unwrap_or(false),
        }))
    }
}

impl LeafField for StringField {
    fn kind(&self) -> FieldKind {
        FieldKind::String
    }

    fn info(&self) -> &FieldInfo {
        &self.info
    }

    fn default_data(&self) -> FieldData {
        FieldData::String(String::new())
    }

    fn validate(&self, data: &FieldData) -> Option<String> {
        let FieldData::String(text) = data else {
            return Some(mismatch_message("string", data));
        };
        let length = text.chars().count();
        match (self.min_length, self.max_length) {
            (Some(min), _) if length < min => Some(format!("must be at least {min} characters")),
            (_, Some(max)) if length > max => Some(format!("must be at most {max} characters")),
            _ => None,
        }
    }

    fn decode(&self, raw: &Value) -> Result<FieldData, String> {
        match raw {
            Value::String(text) => Ok(FieldData::String(text.clone())),
            other => Err(decode_error("string", other)),
        }
    }

    fn encode(&self, data: &FieldData) -> FieldResult<Expression> {
        match data {
            FieldData::String(text) => Ok(Expression::String(text.clone())),
            other => Err(mismatch("string", other)),
        }
    }

    fn sort_configurations(&self) -> Vec<SortConfiguration> {
        vec![SortConfiguration::leaf(
            "string",
            self.info.label_or("String"),
            SortType::String,
        )]
    }

    fn filter_configurations(&self) -> Vec<FilterConfiguration> {
        vec![FilterConfiguration::leaf(
            "string",
            self.info.label_or("String"),
            vec![
                ConditionType::StringEqual,
                ConditionType::StringIncludes,
                ConditionType::StringStartsWith,
                ConditionType::StringEndsWith,
                ConditionType::StringRegex,
            ],
        )]
    }

    fn options(&self) -> FieldOptions {
        FieldOptions {
            min_length: self.min_length,
            max_length: self.max_length,
            multiline: self.multiline.then_some(true),
            ..self.info.to_options(FieldKind::String)
        }
    }
}
