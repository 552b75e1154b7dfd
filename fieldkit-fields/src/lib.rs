//! Schema-driven field engine for fieldkit.
//!
//! Given a [`Model`](fieldkit_model::Model) and optional
//! [`FieldOptions`](fieldkit_model::FieldOptions), the engine builds a tree
//! of typed fields that know how to:
//!
//! - produce default values and validate edits ([`FieldValue`] envelopes)
//! - decode raw stored values and encode values into store
//!   [`Expression`](fieldkit_types::Expression)s
//! - translate [`KeyPath`](fieldkit_types::KeyPath)s into
//!   [`ValuePath`](fieldkit_types::ValuePath)s and extract values along them
//! - expose sort and filter configurations for record lists
//! - run save and delete hooks (password hashing, media commits)
//!
//! # Construction
//!
//! Trees are built in two phases. A [`FieldBuilder`] creates nodes, picking
//! each node's variant from an explicit type in the options or by asking
//! the [`FieldRegistry`] which kind accepts the model. Nothing can fail at
//! this point: problems become error leaves. [`FieldBuilder::initialize`]
//! then resolves recursion labels and returns the immutable [`FieldTree`].
//!
//! ```ignore
//! let registry = FieldRegistry::default();
//! let tree = FieldTree::from_model(&model, None, &registry);
//! let value = tree.root().default_value();
//! ```

mod builder;
mod config;
mod configuration;
mod context;
mod edit;
mod error;
mod fields;
mod hooks;
mod label;
mod registry;
mod tree;
mod value;
mod view_context;

pub use builder::FieldBuilder;
pub use config::EditorConfig;
pub use configuration::{ConditionType, FilterConfiguration, SortConfiguration, SortType};
pub use context::{mock, DeleteContext, HashWorker, HookContext, SaveContext, SessionContext, WorkerContext};
pub use error::{ContextError, ContextResult, FieldError, FieldResult};
pub use fields::{
    BoolField, Collection, CurrentUserField, DateTimeField, EnumField, ErrorField, Field, FieldId,
    FieldInfo, LeafField, ListField, MapField, MediaField, NullField, NumberField, NumberStorage,
    OptionalField, PasswordField, RecurseField, RecursionField, RecursiveField, RefField,
    StringField, StructField, TupleField, UnionField, MEDIA_ANNOTATION,
};
pub use label::{convert_key_to_label, slugify};
pub use registry::{FieldKind, FieldRegistry};
pub use tree::{FieldRef, FieldTree};
pub use value::{
    DateTimeValue, FieldData, FieldValue, ListItem, MapItem, Media, MediaValue, NumberValue,
    OptionalValue, PasswordValue, UnionValue,
};
pub use view_context::ViewContext;
