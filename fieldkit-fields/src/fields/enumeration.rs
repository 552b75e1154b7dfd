use super::{decode_error, mismatch, mismatch_message, Field, FieldId, FieldInfo, LeafField};
use crate::builder::FieldBuilder;
use crate::configuration::{ConditionType, FilterConfiguration, SortConfiguration, SortType};
use crate::error::{FieldError, FieldResult};
use crate::label::convert_key_to_label;
use crate::registry::FieldKind;
use crate::value::FieldData;
use fieldkit_model::{EnumOption, FieldOptions, Model};
use fieldkit_types::Expression;
use serde_json::Value;

/// Selection of one symbol out of a closed set.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumField {
    pub info: FieldInfo,
    /// Every model value exactly once, configured ones first.
    pub options: Vec<EnumOption>,
}

impl EnumField {
    pub(crate) fn create(
        builder: &mut FieldBuilder<'_>,
        model: &Model,
        options: Option<&FieldOptions>,
    ) -> FieldId {
        let Model::Enum { values } = model else {
            return builder.mismatch(FieldKind::Enum, model);
        };

        let configured = options.and_then(|o| o.options.as_deref()).unwrap_or_default();
        let mut resolved: Vec<EnumOption> = configured
            .iter()
            .filter(|option| values.contains(&option.key))
            .cloned()
            .collect();
        for value in values {
            if !resolved.iter().any(|option| &option.key == value) {
                resolved.push(EnumOption::new(value.clone(), convert_key_to_label(value)));
            }
        }

        builder.push(Field::Enum(Self {
            info: FieldInfo::from_options(options),
            options: resolved,
        }))
    }

    fn contains(&self, key: &str) -> bool {
        self.options.iter().any(|option| option.key == key)
    }
}

impl LeafField for EnumField {
    fn kind(&self) -> FieldKind {
        FieldKind::Enum
    }

    fn info(&self) -> &FieldInfo {
        &self.info
    }

    fn default_data(&self) -> FieldData {
        FieldData::Enum(self.options.first().map(|option| option.key.clone()))
    }

    fn validate(&self, data: &FieldData) -> Option<String> {
        match data {
            FieldData::Enum(Some(key)) if self.contains(key) => None,
            FieldData::Enum(Some(key)) => Some(format!("\"{key}\" is not an option")),
            FieldData::Enum(None) => Some("no option selected".to_string()),
            other => Some(mismatch_message("enum", other)),
        }
    }

    fn decode(&self, raw: &Value) -> Result<FieldData, String> {
        match raw {
            Value::String(key) => Ok(FieldData::Enum(Some(key.clone()))),
            other => Err(decode_error("option key", other)),
        }
    }

    fn encode(&self, data: &FieldData) -> FieldResult<Expression> {
        match data {
            FieldData::Enum(Some(key)) if self.contains(key) => Ok(Expression::Symbol(key.clone())),
            FieldData::Enum(_) => Err(FieldError::InvalidValue(
                self.validate(data).unwrap_or_default(),
            )),
            other => Err(mismatch("enum", other)),
        }
    }

    fn sort_configurations(&self) -> Vec<SortConfiguration> {
        vec![SortConfiguration::leaf(
            "enum",
            self.info.label_or("Option"),
            SortType::String,
        )]
    }

    fn filter_configurations(&self) -> Vec<FilterConfiguration> {
        let mut filter = FilterConfiguration::leaf(
            "enum",
            self.info.label_or("Option"),
            vec![ConditionType::EnumEqual],
        );
        filter.options = Some(self.options.clone());
        vec![filter]
    }

    fn options(&self) -> FieldOptions {
        FieldOptions {
            options: Some(self.options.clone()),
            ..self.info.to_options(FieldKind::Enum)
        }
    }
}
