//! Schema model and persisted configuration for fieldkit.
//!
//! Defines the types the field engine consumes but does not own:
//! - [`Model`]: the closed, recursive schema ADT supplied by the schema service
//! - [`FieldOptions`]: per-node editor configuration mirroring the field tree
//! - [`ViewContextOptions`]: per-model view configuration
//! - [`Record`] / [`RecordRef`]: stored records and references between them
//!
//! All of these round-trip through JSON; the field engine never mutates them.

mod error;
mod options;
mod record;
mod schema;

pub use error::{ModelError, ModelResult};
pub use options::{EnumOption, FieldOptions, ViewContextOptions};
pub use record::{Record, RecordRef};
pub use schema::Model;
