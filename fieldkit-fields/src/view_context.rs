//! Per-model views.
//!
//! A [`ViewContext`] pairs a model with its field tree and the metadata a
//! record browser needs: name, slug, color, which fields summarize a
//! record, and the sort and filter menus. It also runs the full save and
//! delete pipelines for records of its model.

use crate::builder::FieldBuilder;
use crate::config::EditorConfig;
use crate::configuration::{FilterConfiguration, SortConfiguration, SortType};
use crate::context::{DeleteContext, SaveContext};
use crate::error::{FieldError, FieldResult};
use crate::fields::Field;
use crate::label::{convert_key_to_label, slugify};
use crate::registry::{FieldKind, FieldRegistry};
use crate::tree::{FieldRef, FieldTree};
use crate::value::FieldValue;
use fieldkit_model::{Model, Record, ViewContextOptions};
use fieldkit_types::{KeyPath, KeySegment, ValuePath};
use tracing::{debug, info};

/// View of one model.
#[derive(Debug, Clone)]
pub struct ViewContext {
    /// Identity of the model, as used in references and store calls.
    pub model_id: String,
    pub model: Model,
    pub name: String,
    pub slug: String,
    pub color: Option<String>,
    pub description: Option<String>,
    /// Fields whose values summarize a record.
    pub display_key_paths: Vec<KeyPath>,
    tree: FieldTree,
    sort_configurations: Vec<SortConfiguration>,
}

impl ViewContext {
    /// Builds a view with everything inferred from the model.
    ///
    /// The first string member of a struct root becomes the display field.
    pub fn infer_from_model(
        model_id: &str,
        model: Model,
        registry: &FieldRegistry,
        config: &EditorConfig,
    ) -> Self {
        let options = ViewContextOptions {
            model: model_id.to_string(),
            ..ViewContextOptions::default()
        };
        Self::from_options(model, &options, registry, config)
    }

    /// Builds a view from persisted options; anything they leave out is
    /// inferred.
    pub fn from_options(
        model: Model,
        options: &ViewContextOptions,
        registry: &FieldRegistry,
        config: &EditorConfig,
    ) -> Self {
        let mut builder =
            FieldBuilder::new(registry).with_ignored(config.ignored_field_types.iter().cloned());
        let root = builder.create_field(&model, options.field.as_ref());
        let tree = builder.initialize(root);

        let name = options
            .name
            .clone()
            .unwrap_or_else(|| convert_key_to_label(&options.model));
        let slug = options.slug.clone().unwrap_or_else(|| slugify(&name));
        let display_key_paths = options
            .display_key_paths
            .clone()
            .unwrap_or_else(|| infer_display_key_paths(tree.root()));

        let mut sort_configurations = vec![
            SortConfiguration {
                key: "created".to_string(),
                label: "Created".to_string(),
                sort_type: SortType::Date,
                path: ValuePath::root(),
            },
            SortConfiguration {
                key: "updated".to_string(),
                label: "Updated".to_string(),
                sort_type: SortType::Date,
                path: ValuePath::root(),
            },
        ];
        sort_configurations.extend(tree.root().sort_configurations().iter().cloned());

        info!("Created view context for {} ({} fields)", options.model, tree.len());
        Self {
            model_id: options.model.clone(),
            model,
            name,
            slug,
            color: options.color.clone(),
            description: options.description.clone(),
            display_key_paths,
            tree,
            sort_configurations,
        }
    }

    /// Options that rebuild this view.
    pub fn to_options(&self) -> ViewContextOptions {
        ViewContextOptions {
            model: self.model_id.clone(),
            name: Some(self.name.clone()),
            slug: Some(self.slug.clone()),
            color: self.color.clone(),
            description: self.description.clone(),
            display_key_paths: Some(self.display_key_paths.clone()),
            field: Some(self.field().options()),
        }
    }

    pub fn tree(&self) -> &FieldTree {
        &self.tree
    }

    /// The root field.
    pub fn field(&self) -> FieldRef<'_> {
        self.tree.root()
    }

    /// `created` and `updated` followed by the root field's sort options.
    pub fn sort_configurations(&self) -> &[SortConfiguration] {
        &self.sort_configurations
    }

    pub fn filter_configurations(&self) -> &[FilterConfiguration] {
        self.field().filter_configurations()
    }

    /// Values the display key paths address in `value`, in order.
    pub fn display_values<'v>(&self, value: &'v FieldValue) -> Vec<&'v FieldValue> {
        self.display_key_paths
            .iter()
            .flat_map(|path| self.field().values_for_key_path(value, path))
            .collect()
    }

    /// Decodes a stored record into an editable value.
    pub fn decode_record(&self, record: &Record) -> FieldValue {
        self.field().transform_raw_value(&record.value)
    }

    /// Runs the save hooks, encodes the result and stores it.
    ///
    /// Returns the stored record together with the value as it stands
    /// after the hooks, marked as saved. An invalid value is refused before
    /// any hook runs, so no upload is committed for it.
    pub async fn save_value(&self, value: &FieldValue, ctx: &SaveContext) -> FieldResult<(Record, FieldValue)> {
        if !value.is_valid {
            return Err(FieldError::InvalidValue(
                value
                    .error
                    .clone()
                    .unwrap_or_else(|| format!("invalid {} record", self.model_id)),
            ));
        }
        let field = self.field();
        let mut saved = field.on_save(value, ctx).await?;
        let expression = field.transform_value_to_expression(&saved)?;

        debug!("Saving {} record {:?}", self.model_id, ctx.id);
        let record = ctx
            .session
            .save_record(&self.model_id, ctx.id.as_deref(), &expression)
            .await?;
        saved.mark_saved();
        Ok((record, saved))
    }

    /// Runs the delete hooks and deletes the record.
    pub async fn delete_value(&self, value: &FieldValue, ctx: &DeleteContext) -> FieldResult<()> {
        let id = ctx
            .id
            .as_deref()
            .ok_or_else(|| FieldError::InvalidValue("cannot delete a record without an id".to_string()))?;
        self.field().on_delete(value, ctx).await?;
        ctx.session.delete_record(&self.model_id, id).await?;
        info!("Deleted {} record {id}", self.model_id);
        Ok(())
    }
}

/// The first string member of a struct root.
fn infer_display_key_paths(root: FieldRef<'_>) -> Vec<KeyPath> {
    let root = root.effective();
    let Field::Struct(structure) = root.field() else {
        return Vec::new();
    };
    structure
        .fields
        .iter()
        .find(|(_, id)| root.tree().get(*id).effective().kind() == FieldKind::String)
        .map(|(key, _)| vec![KeyPath::from(vec![KeySegment::Key(key.clone())])])
        .unwrap_or_default()
}
