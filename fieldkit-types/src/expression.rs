//! Query expression DSL.
//!
//! Field values are persisted by encoding them into [`Expression`] trees,
//! which the backing store evaluates. The JSON form is externally tagged,
//! e.g. `{"string": "hello"}` or `{"struct": [["title", {"string": "x"}]]}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A data-constructor expression understood by the backing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Expression {
    Null,
    Bool(bool),
    String(String),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Float(f64),
    /// RFC 3339 timestamp.
    DateTime(String),
    /// Enum option key.
    Symbol(String),
    /// Resolved by the store to a reference to the authenticated user.
    CurrentUser,
    Ref { model: String, id: String },
    Struct(Vec<(String, Expression)>),
    Tuple(Vec<Expression>),
    Union { key: String, value: Box<Expression> },
    List(Vec<Expression>),
    Set(Vec<Expression>),
    Map(Vec<(String, Expression)>),
}

impl Expression {
    /// Builds a union expression selecting `key`.
    pub fn union(key: impl Into<String>, value: Expression) -> Self {
        Self::Union {
            key: key.into(),
            value: Box::new(value),
        }
    }

    /// Builds a reference expression.
    pub fn reference(model: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Ref {
            model: model.into(),
            id: id.into(),
        }
    }

    /// Returns the constructor tag of this expression (`"struct"`, `"int32"`, ...).
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::String(_) => "string",
            Self::Int8(_) => "int8",
            Self::Int16(_) => "int16",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::Uint8(_) => "uint8",
            Self::Uint16(_) => "uint16",
            Self::Uint32(_) => "uint32",
            Self::Uint64(_) => "uint64",
            Self::Float(_) => "float",
            Self::DateTime(_) => "dateTime",
            Self::Symbol(_) => "symbol",
            Self::CurrentUser => "currentUser",
            Self::Ref { .. } => "ref",
            Self::Struct(_) => "struct",
            Self::Tuple(_) => "tuple",
            Self::Union { .. } => "union",
            Self::List(_) => "list",
            Self::Set(_) => "set",
            Self::Map(_) => "map",
        }
    }

    /// Decodes the expression back into the raw stored value shape.
    ///
    /// This is the inverse the store applies when it evaluates a data
    /// expression: references become `[model, id]` pairs, unions become
    /// single-key objects, sets become arrays. `CurrentUser` has no raw
    /// form before the store resolves it and decodes to `null`.
    pub fn to_raw(&self) -> Value {
        match self {
            Self::Null | Self::CurrentUser => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::String(s) | Self::DateTime(s) | Self::Symbol(s) => Value::String(s.clone()),
            Self::Int8(n) => Value::from(*n),
            Self::Int16(n) => Value::from(*n),
            Self::Int32(n) => Value::from(*n),
            Self::Int64(n) => Value::from(*n),
            Self::Uint8(n) => Value::from(*n),
            Self::Uint16(n) => Value::from(*n),
            Self::Uint32(n) => Value::from(*n),
            Self::Uint64(n) => Value::from(*n),
            Self::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            Self::Ref { model, id } => {
                Value::Array(vec![Value::String(model.clone()), Value::String(id.clone())])
            }
            Self::Struct(fields) | Self::Map(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, expr)| (key.clone(), expr.to_raw()))
                    .collect::<Map<_, _>>(),
            ),
            Self::Tuple(items) | Self::List(items) | Self::Set(items) => {
                Value::Array(items.iter().map(Expression::to_raw).collect())
            }
            Self::Union { key, value } => {
                let mut object = Map::new();
                object.insert(key.clone(), value.to_raw());
                Value::Object(object)
            }
        }
    }
}
