use super::{decode_error, mismatch, mismatch_message, Field, FieldId, FieldInfo, LeafField};
use crate::builder::FieldBuilder;
use crate::configuration::{ConditionType, FilterConfiguration, SortConfiguration, SortType};
use crate::error::{FieldError, FieldResult};
use crate::registry::FieldKind;
use crate::value::{DateTimeValue, FieldData};
use chrono::{SecondsFormat, SubsecRound, Utc};
use fieldkit_model::{FieldOptions, Model};
use fieldkit_types::Expression;
use serde_json::Value;

/// Timestamp input. The raw text is kept next to the parsed instant so an
/// unparsable entry is shown back to the user instead of being dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct DateTimeField {
    pub info: FieldInfo,
}

impl DateTimeField {
    pub(crate) fn create(
        builder: &mut FieldBuilder<'_>,
        model: &Model,
        options: Option<&FieldOptions>,
    ) -> FieldId {
        if !matches!(model, Model::DateTime) {
            return builder.mismatch(FieldKind::DateTime, model);
        }
        builder.push(Field::DateTime(Self {
            info: FieldInfo::from_options(options),
        }))
    }
}

impl LeafField for DateTimeField {
    fn kind(&self) -> FieldKind {
        FieldKind::DateTime
    }

    fn info(&self) -> &FieldInfo {
        &self.info
    }

    /// The current time, truncated to whole seconds.
    fn default_data(&self) -> FieldData {
        FieldData::DateTime(DateTimeValue::from_date(Utc::now().trunc_subsecs(0)))
    }

    fn validate(&self, data: &FieldData) -> Option<String> {
        match data {
            FieldData::DateTime(DateTimeValue { date: Some(_), .. }) => None,
            FieldData::DateTime(DateTimeValue { input, .. }) => {
                Some(format!("\"{input}\" is not a valid date"))
            }
            other => Some(mismatch_message("dateTime", other)),
        }
    }

    fn decode(&self, raw: &Value) -> Result<FieldData, String> {
        match raw {
            Value::String(input) => Ok(FieldData::DateTime(DateTimeValue::parse(input.as_str()))),
            other => Err(decode_error("date string", other)),
        }
    }

    fn encode(&self, data: &FieldData) -> FieldResult<Expression> {
        match data {
            FieldData::DateTime(DateTimeValue {
                date: Some(date), ..
            }) => Ok(Expression::DateTime(
                date.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            )),
            FieldData::DateTime(DateTimeValue { input, .. }) => Err(FieldError::InvalidValue(
                format!("\"{input}\" is not a valid date"),
            )),
            other => Err(mismatch("dateTime", other)),
        }
    }

    fn sort_configurations(&self) -> Vec<SortConfiguration> {
        vec![SortConfiguration::leaf(
            "dateTime",
            self.info.label_or("Date"),
            SortType::Date,
        )]
    }

    fn filter_configurations(&self) -> Vec<FilterConfiguration> {
        vec![FilterConfiguration::leaf(
            "dateTime",
            self.info.label_or("Date"),
            vec![
                ConditionType::DateEqual,
                ConditionType::DateMin,
                ConditionType::DateMax,
            ],
        )]
    }
}
