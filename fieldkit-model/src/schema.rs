use crate::error::ModelResult;
use serde::{Deserialize, Serialize};

/// Describes the shape of a stored value.
///
/// The JSON form is internally tagged by `type`, e.g.
/// `{"type": "struct", "fields": [["title", {"type": "string"}]]}`.
/// Struct and union members keep their declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Model {
    String,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float,
    DateTime,
    Null,
    Enum {
        values: Vec<String>,
    },
    /// Reference to a record of another model.
    Ref {
        model: String,
    },
    Struct {
        fields: Vec<(String, Model)>,
    },
    Tuple {
        fields: Vec<Model>,
    },
    Union {
        fields: Vec<(String, Model)>,
    },
    Optional {
        model: Box<Model>,
    },
    List {
        model: Box<Model>,
    },
    Set {
        model: Box<Model>,
    },
    Map {
        model: Box<Model>,
    },
    /// Store-level uniqueness constraint; transparent to the editor.
    Unique {
        model: Box<Model>,
    },
    /// Opaque tag attached by plugins, e.g. `field:media`.
    Annotation {
        value: String,
        model: Box<Model>,
    },
    /// Group of mutually recursive models; `top` names the entry point.
    Recursive {
        top: String,
        models: Vec<(String, Model)>,
    },
    /// Introduces `label` for the wrapped model.
    Recursion {
        label: String,
        model: Box<Model>,
    },
    /// Refers back to a label introduced by an enclosing recursion.
    Recurse {
        label: String,
    },
}

impl Model {
    /// Parses a model from its JSON form.
    pub fn from_json(json: &str) -> ModelResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the `type` tag of this model.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Float => "float",
            Self::DateTime => "dateTime",
            Self::Null => "null",
            Self::Enum { .. } => "enum",
            Self::Ref { .. } => "ref",
            Self::Struct { .. } => "struct",
            Self::Tuple { .. } => "tuple",
            Self::Union { .. } => "union",
            Self::Optional { .. } => "optional",
            Self::List { .. } => "list",
            Self::Set { .. } => "set",
            Self::Map { .. } => "map",
            Self::Unique { .. } => "unique",
            Self::Annotation { .. } => "annotation",
            Self::Recursive { .. } => "recursive",
            Self::Recursion { .. } => "recursion",
            Self::Recurse { .. } => "recurse",
        }
    }

    /// Returns `true` for the numeric storage types.
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::Uint8
                | Self::Uint16
                | Self::Uint32
                | Self::Uint64
                | Self::Float
        )
    }

    /// Peels `unique` and `annotation` wrappers, collecting annotation tags
    /// into `annotations`.
    pub fn unwrap_into<'a>(&'a self, annotations: &mut Vec<String>) -> &'a Model {
        let mut current = self;
        loop {
            match current {
                Self::Unique { model } => current = model,
                Self::Annotation { value, model } => {
                    annotations.push(value.clone());
                    current = model;
                }
                other => return other,
            }
        }
    }

    // ── Constructors ─────────────────────────────────────────────

    /// Shorthand for a struct model.
    pub fn structure<K: Into<String>>(fields: impl IntoIterator<Item = (K, Model)>) -> Self {
        Self::Struct {
            fields: fields.into_iter().map(|(k, m)| (k.into(), m)).collect(),
        }
    }

    /// Shorthand for a union model.
    pub fn union<K: Into<String>>(fields: impl IntoIterator<Item = (K, Model)>) -> Self {
        Self::Union {
            fields: fields.into_iter().map(|(k, m)| (k.into(), m)).collect(),
        }
    }

    /// Shorthand for a tuple model.
    pub fn tuple(fields: impl IntoIterator<Item = Model>) -> Self {
        Self::Tuple {
            fields: fields.into_iter().collect(),
        }
    }

    /// Shorthand for an enum model.
    pub fn enumeration<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Shorthand for a reference model.
    pub fn reference(model: impl Into<String>) -> Self {
        Self::Ref {
            model: model.into(),
        }
    }

    /// Shorthand for an optional model.
    pub fn optional(model: Model) -> Self {
        Self::Optional {
            model: Box::new(model),
        }
    }

    /// Shorthand for a list model.
    pub fn list(model: Model) -> Self {
        Self::List {
            model: Box::new(model),
        }
    }

    /// Shorthand for a set model.
    pub fn set(model: Model) -> Self {
        Self::Set {
            model: Box::new(model),
        }
    }

    /// Shorthand for a map model.
    pub fn map(model: Model) -> Self {
        Self::Map {
            model: Box::new(model),
        }
    }

    /// Shorthand for a unique wrapper.
    pub fn unique(model: Model) -> Self {
        Self::Unique {
            model: Box::new(model),
        }
    }

    /// Shorthand for an annotation wrapper.
    pub fn annotation(value: impl Into<String>, model: Model) -> Self {
        Self::Annotation {
            value: value.into(),
            model: Box::new(model),
        }
    }

    /// Shorthand for a recursive group.
    pub fn recursive<K: Into<String>>(
        top: impl Into<String>,
        models: impl IntoIterator<Item = (K, Model)>,
    ) -> Self {
        Self::Recursive {
            top: top.into(),
            models: models.into_iter().map(|(k, m)| (k.into(), m)).collect(),
        }
    }

    /// Shorthand for a recursion label.
    pub fn recursion(label: impl Into<String>, model: Model) -> Self {
        Self::Recursion {
            label: label.into(),
            model: Box::new(model),
        }
    }

    /// Shorthand for a reference to a recursion label.
    pub fn recurse(label: impl Into<String>) -> Self {
        Self::Recurse {
            label: label.into(),
        }
    }
}
