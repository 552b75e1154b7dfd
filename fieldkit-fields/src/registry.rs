//! Field kinds and the registry inference walks.

use crate::builder::FieldBuilder;
use crate::fields::{
    BoolField, CurrentUserField, DateTimeField, EnumField, ErrorField, Field, FieldId, ListField,
    MapField, MediaField, NullField, NumberField, OptionalField, PasswordField, RecurseField,
    RecursionField, RecursiveField, RefField, StringField, StructField, TupleField, UnionField,
    MEDIA_ANNOTATION,
};
use fieldkit_model::{FieldOptions, Model};

/// Every field variant, named by its type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    Bool,
    Number,
    DateTime,
    Enum,
    Null,
    CurrentUser,
    Ref,
    Password,
    Media,
    Error,
    Struct,
    Tuple,
    Union,
    Optional,
    List,
    Set,
    Map,
    Recursive,
    Recursion,
    Recurse,
}

impl FieldKind {
    pub const ALL: [FieldKind; 21] = [
        Self::String,
        Self::Bool,
        Self::Number,
        Self::DateTime,
        Self::Enum,
        Self::Null,
        Self::CurrentUser,
        Self::Ref,
        Self::Password,
        Self::Media,
        Self::Error,
        Self::Struct,
        Self::Tuple,
        Self::Union,
        Self::Optional,
        Self::List,
        Self::Set,
        Self::Map,
        Self::Recursive,
        Self::Recursion,
        Self::Recurse,
    ];

    /// The tag used in `FieldOptions::field_type`.
    pub const fn type_tag(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::DateTime => "dateTime",
            Self::Enum => "enum",
            Self::Null => "null",
            Self::CurrentUser => "currentUser",
            Self::Ref => "ref",
            Self::Password => "password",
            Self::Media => "media",
            Self::Error => "error",
            Self::Struct => "struct",
            Self::Tuple => "tuple",
            Self::Union => "union",
            Self::Optional => "optional",
            Self::List => "list",
            Self::Set => "set",
            Self::Map => "map",
            Self::Recursive => "recursive",
            Self::Recursion => "recursion",
            Self::Recurse => "recurse",
        }
    }

    pub fn from_type_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_tag() == tag)
    }

    /// Whether inference may pick this kind for an unwrapped model.
    ///
    /// `password`, `currentUser` and `error` are never inferred; they are
    /// only reachable through an explicit type in the options.
    pub fn can_infer_from_model(self, model: &Model, annotations: &[String]) -> bool {
        match self {
            Self::String => matches!(model, Model::String),
            Self::Bool => matches!(model, Model::Bool),
            Self::Number => model.is_number(),
            Self::DateTime => matches!(model, Model::DateTime),
            Self::Enum => matches!(model, Model::Enum { .. }),
            Self::Null => matches!(model, Model::Null),
            Self::Ref => matches!(model, Model::Ref { .. }),
            Self::Media => {
                matches!(model, Model::Struct { .. })
                    && annotations.iter().any(|a| a == MEDIA_ANNOTATION)
            }
            Self::Struct => matches!(model, Model::Struct { .. }),
            Self::Tuple => matches!(model, Model::Tuple { .. }),
            Self::Union => matches!(model, Model::Union { .. }),
            Self::Optional => matches!(model, Model::Optional { .. }),
            Self::List => matches!(model, Model::List { .. }),
            Self::Set => matches!(model, Model::Set { .. }),
            Self::Map => matches!(model, Model::Map { .. }),
            Self::Recursive => matches!(model, Model::Recursive { .. }),
            Self::Recursion => matches!(model, Model::Recursion { .. }),
            Self::Recurse => matches!(model, Model::Recurse { .. }),
            Self::CurrentUser | Self::Password | Self::Error => false,
        }
    }

    /// Builds a node of this kind, or an error leaf when the model has the
    /// wrong shape.
    pub(crate) fn create(
        self,
        builder: &mut FieldBuilder<'_>,
        model: &Model,
        options: Option<&FieldOptions>,
    ) -> FieldId {
        match self {
            Self::String => StringField::create(builder, model, options),
            Self::Bool => BoolField::create(builder, model, options),
            Self::Number => NumberField::create(builder, model, options),
            Self::DateTime => DateTimeField::create(builder, model, options),
            Self::Enum => EnumField::create(builder, model, options),
            Self::Null => NullField::create(builder, model, options),
            Self::CurrentUser => CurrentUserField::create(builder, model, options),
            Self::Ref => RefField::create(builder, model, options),
            Self::Password => PasswordField::create(builder, model, options),
            Self::Media => MediaField::create(builder, model, options),
            Self::Error => builder.push(Field::Error(ErrorField::new(format!(
                "error field requested for model of type \"{}\"",
                model.type_name()
            )))),
            Self::Struct => StructField::create(builder, model, options),
            Self::Tuple => TupleField::create(builder, model, options),
            Self::Union => UnionField::create(builder, model, options),
            Self::Optional => OptionalField::create(builder, model, options),
            Self::List | Self::Set => ListField::create(builder, model, options),
            Self::Map => MapField::create(builder, model, options),
            Self::Recursive => RecursiveField::create(builder, model, options),
            Self::Recursion => RecursionField::create(builder, model, options),
            Self::Recurse => RecurseField::create(builder, model),
        }
    }
}

/// Ordered set of field kinds available to a builder.
///
/// Inference tries kinds in registration order and picks the first that
/// accepts the model, so more specific kinds must come first (`media`
/// before `struct`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRegistry {
    kinds: Vec<FieldKind>,
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self {
            kinds: vec![
                FieldKind::Media,
                FieldKind::String,
                FieldKind::Bool,
                FieldKind::Number,
                FieldKind::DateTime,
                FieldKind::Enum,
                FieldKind::Null,
                FieldKind::Ref,
                FieldKind::Struct,
                FieldKind::Tuple,
                FieldKind::Union,
                FieldKind::Optional,
                FieldKind::List,
                FieldKind::Set,
                FieldKind::Map,
                FieldKind::Recursive,
                FieldKind::Recursion,
                FieldKind::Recurse,
                FieldKind::Password,
                FieldKind::CurrentUser,
            ],
        }
    }
}

impl FieldRegistry {
    pub fn empty() -> Self {
        Self { kinds: Vec::new() }
    }

    /// Appends `kind`; a kind that is already registered keeps its place.
    pub fn register(&mut self, kind: FieldKind) -> &mut Self {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
        self
    }

    pub fn unregister(&mut self, kind: FieldKind) -> &mut Self {
        self.kinds.retain(|k| *k != kind);
        self
    }

    pub fn kinds(&self) -> &[FieldKind] {
        &self.kinds
    }

    /// Resolves an explicit type tag against the registered kinds.
    pub fn get(&self, type_tag: &str) -> Option<FieldKind> {
        self.kinds
            .iter()
            .copied()
            .find(|kind| kind.type_tag() == type_tag)
    }

    /// First registered kind that accepts `model`, skipping `ignore`d tags.
    pub fn infer(&self, model: &Model, annotations: &[String], ignore: &[String]) -> Option<FieldKind> {
        self.kinds.iter().copied().find(|kind| {
            !ignore.iter().any(|tag| tag == kind.type_tag())
                && kind.can_infer_from_model(model, annotations)
        })
    }
}
