use super::{mismatch, mismatch_message, Field, FieldId, FieldInfo, LeafField};
use crate::builder::FieldBuilder;
use crate::configuration::{ConditionType, FilterConfiguration};
use crate::error::{FieldError, FieldResult};
use crate::registry::FieldKind;
use crate::value::FieldData;
use fieldkit_model::{FieldOptions, Model, RecordRef};
use fieldkit_types::Expression;
use serde_json::Value;

/// Reference to a record of one target model.
#[derive(Debug, Clone, PartialEq)]
pub struct RefField {
    pub info: FieldInfo,
    /// Model the referenced record must belong to.
    pub model: String,
}

impl RefField {
    pub(crate) fn create(
        builder: &mut FieldBuilder<'_>,
        model: &Model,
        options: Option<&FieldOptions>,
    ) -> FieldId {
        let Model::Ref { model: target } = model else {
            return builder.mismatch(FieldKind::Ref, model);
        };
        builder.push(Field::Ref(Self {
            info: FieldInfo::from_options(options),
            model: target.clone(),
        }))
    }
}

impl LeafField for RefField {
    fn kind(&self) -> FieldKind {
        FieldKind::Ref
    }

    fn info(&self) -> &FieldInfo {
        &self.info
    }

    fn default_data(&self) -> FieldData {
        FieldData::Ref(None)
    }

    fn validate(&self, data: &FieldData) -> Option<String> {
        match data {
            FieldData::Ref(Some(reference)) if reference.model == self.model => None,
            FieldData::Ref(Some(reference)) => Some(format!(
                "expected a \"{}\" record, got \"{}\"",
                self.model, reference.model
            )),
            FieldData::Ref(None) => Some("no record selected".to_string()),
            other => Some(mismatch_message("ref", other)),
        }
    }

    fn decode(&self, raw: &Value) -> Result<FieldData, String> {
        match raw {
            Value::Null => Ok(FieldData::Ref(None)),
            other => RecordRef::from_raw(other)
                .map(|reference| FieldData::Ref(Some(reference)))
                .map_err(|e| e.to_string()),
        }
    }

    fn encode(&self, data: &FieldData) -> FieldResult<Expression> {
        match data {
            FieldData::Ref(Some(reference)) if reference.model == self.model => Ok(
                Expression::reference(reference.model.clone(), reference.id.clone()),
            ),
            FieldData::Ref(_) => Err(FieldError::InvalidValue(
                self.validate(data).unwrap_or_default(),
            )),
            other => Err(mismatch("ref", other)),
        }
    }

    fn filter_configurations(&self) -> Vec<FilterConfiguration> {
        vec![FilterConfiguration::leaf(
            "ref",
            self.info.label_or("Reference"),
            vec![ConditionType::RefEqual],
        )]
    }
}
