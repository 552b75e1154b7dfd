use super::{decode_error, mismatch, mismatch_message, Field, FieldId, FieldInfo, LeafField};
use crate::builder::FieldBuilder;
use crate::configuration::{ConditionType, FilterConfiguration, SortConfiguration, SortType};
use crate::error::{FieldError, FieldResult};
use crate::registry::FieldKind;
use crate::value::{FieldData, NumberValue};
use fieldkit_model::{FieldOptions, Model};
use fieldkit_types::Expression;
use serde_json::Value;

/// Numeric storage type a number field persists as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberStorage {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float,
}

impl NumberStorage {
    pub fn from_model(model: &Model) -> Option<Self> {
        Some(match model {
            Model::Int8 => Self::Int8,
            Model::Int16 => Self::Int16,
            Model::Int32 => Self::Int32,
            Model::Int64 => Self::Int64,
            Model::Uint8 => Self::Uint8,
            Model::Uint16 => Self::Uint16,
            Model::Uint32 => Self::Uint32,
            Model::Uint64 => Self::Uint64,
            Model::Float => Self::Float,
            _ => return None,
        })
    }

    pub fn is_integer(self) -> bool {
        self != Self::Float
    }

    /// Inclusive range of an integer storage type; `None` for `float`.
    pub fn integer_bounds(self) -> Option<(i128, i128)> {
        Some(match self {
            Self::Int8 => (i8::MIN.into(), i8::MAX.into()),
            Self::Int16 => (i16::MIN.into(), i16::MAX.into()),
            Self::Int32 => (i32::MIN.into(), i32::MAX.into()),
            Self::Int64 => (i64::MIN.into(), i64::MAX.into()),
            Self::Uint8 => (0, u8::MAX.into()),
            Self::Uint16 => (0, u16::MAX.into()),
            Self::Uint32 => (0, u32::MAX.into()),
            Self::Uint64 => (0, u64::MAX.into()),
            Self::Float => return None,
        })
    }

    /// Encodes `n`, or `None` when it does not fit the storage type.
    fn integer_expression(self, n: i128) -> Option<Expression> {
        Some(match self {
            Self::Int8 => Expression::Int8(n.try_into().ok()?),
            Self::Int16 => Expression::Int16(n.try_into().ok()?),
            Self::Int32 => Expression::Int32(n.try_into().ok()?),
            Self::Int64 => Expression::Int64(n.try_into().ok()?),
            Self::Uint8 => Expression::Uint8(n.try_into().ok()?),
            Self::Uint16 => Expression::Uint16(n.try_into().ok()?),
            Self::Uint32 => Expression::Uint32(n.try_into().ok()?),
            Self::Uint64 => Expression::Uint64(n.try_into().ok()?),
            Self::Float => return None,
        })
    }
}

/// Number input for any numeric storage type.
///
/// Configured `min`/`max` are clamped into the storage range, so an `int8`
/// field configured with `max: 1000` still rejects 128. Integer storage
/// validates and encodes exact integers; nothing above 2^53 is rounded.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberField {
    pub info: FieldInfo,
    pub storage: NumberStorage,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
}

impl NumberField {
    pub(crate) fn create(
        builder: &mut FieldBuilder<'_>,
        model: &Model,
        options: Option<&FieldOptions>,
    ) -> FieldId {
        let Some(storage) = NumberStorage::from_model(model) else {
            return builder.mismatch(FieldKind::Number, model);
        };
        builder.push(Field::Number(Self {
            info: FieldInfo::from_options(options),
            storage,
            min: options.and_then(|o| o.min),
            max: options.and_then(|o| o.max),
            step: options.and_then(|o| o.step),
        }))
    }

    /// Effective inclusive range of an integer field: configured bounds
    /// rounded inwards and clamped into storage. `None` for `float`.
    pub fn integer_range(&self) -> Option<(i128, i128)> {
        let (lower, upper) = self.storage.integer_bounds()?;
        let min = self
            .min
            .filter(|min| !min.is_nan())
            .map_or(lower, |min| (min.ceil() as i128).clamp(lower, upper));
        let max = self
            .max
            .filter(|max| !max.is_nan())
            .map_or(upper, |max| (max.floor() as i128).clamp(lower, upper));
        Some((min, max))
    }

    /// Effective inclusive range of a `float` field.
    pub fn float_range(&self) -> (f64, f64) {
        let min = self.min.filter(|min| !min.is_nan()).unwrap_or(f64::MIN);
        let max = self.max.filter(|max| !max.is_nan()).unwrap_or(f64::MAX);
        (min, max)
    }
}

impl LeafField for NumberField {
    fn kind(&self) -> FieldKind {
        FieldKind::Number
    }

    fn info(&self) -> &FieldInfo {
        &self.info
    }

    /// Zero, moved into range when the range excludes it.
    fn default_data(&self) -> FieldData {
        FieldData::Number(match self.integer_range() {
            Some((min, max)) => {
                NumberValue::from_integer(if min > 0 { min } else if max < 0 { max } else { 0 })
            }
            None => {
                let (min, max) = self.float_range();
                NumberValue::Float(if min > 0.0 { min } else if max < 0.0 { max } else { 0.0 })
            }
        })
    }

    fn validate(&self, data: &FieldData) -> Option<String> {
        let FieldData::Number(value) = *data else {
            return Some(mismatch_message("number", data));
        };
        if !value.as_f64().is_finite() {
            return Some("must be a finite number".to_string());
        }
        match self.integer_range() {
            Some((min, max)) => match value.as_integer() {
                None => Some("must be a whole number".to_string()),
                Some(n) if n < min => Some(format!("must be at least {min}")),
                Some(n) if n > max => Some(format!("must be at most {max}")),
                Some(_) => None,
            },
            None => {
                let (min, max) = self.float_range();
                let value = value.as_f64();
                if value < min {
                    Some(format!("must be at least {min}"))
                } else if value > max {
                    Some(format!("must be at most {max}"))
                } else {
                    None
                }
            }
        }
    }

    fn decode(&self, raw: &Value) -> Result<FieldData, String> {
        let value = NumberValue::from_json(raw).ok_or_else(|| decode_error("number", raw))?;
        Ok(FieldData::Number(if self.storage.is_integer() {
            value
        } else {
            NumberValue::Float(value.as_f64())
        }))
    }

    fn encode(&self, data: &FieldData) -> FieldResult<Expression> {
        let FieldData::Number(value) = *data else {
            return Err(mismatch("number", data));
        };
        if let Some(error) = self.validate(data) {
            return Err(FieldError::InvalidValue(error));
        }
        if !self.storage.is_integer() {
            return Ok(Expression::Float(value.as_f64()));
        }
        value
            .as_integer()
            .and_then(|n| self.storage.integer_expression(n))
            .ok_or_else(|| FieldError::InvalidValue("must be a whole number".to_string()))
    }

    fn sort_configurations(&self) -> Vec<SortConfiguration> {
        vec![SortConfiguration::leaf(
            "number",
            self.info.label_or("Number"),
            SortType::Number,
        )]
    }

    fn filter_configurations(&self) -> Vec<FilterConfiguration> {
        vec![FilterConfiguration::leaf(
            "number",
            self.info.label_or("Number"),
            vec![
                ConditionType::NumberEqual,
                ConditionType::NumberMin,
                ConditionType::NumberMax,
            ],
        )]
    }

    fn options(&self) -> FieldOptions {
        FieldOptions {
            min: self.min,
            max: self.max,
            step: self.step,
            ..self.info.to_options(FieldKind::Number)
        }
    }
}
