//! Two-phase field tree construction.
//!
//! [`FieldBuilder`] is the first phase: it maps models to field nodes and
//! stores them in an arena. Back-references made by `recurse` models are
//! only labels at this point. [`FieldBuilder::initialize`] is the second
//! phase: it walks the arena top-down, resolves every label to the node an
//! enclosing recursion binds it to, computes sort and filter
//! configurations, and hands back an immutable [`FieldTree`]. A tree that
//! has not been initialized cannot be observed.

use crate::configuration::Aggregates;
use crate::fields::{ErrorField, Field, FieldId};
use crate::registry::{FieldKind, FieldRegistry};
use crate::tree::FieldTree;
use fieldkit_model::{FieldOptions, Model};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Label to field bindings visible at one point of the tree.
type Bindings = HashMap<String, FieldId>;

/// Builds field nodes from models using a registry.
#[derive(Debug)]
pub struct FieldBuilder<'r> {
    registry: &'r FieldRegistry,
    ignored: Vec<String>,
    nodes: Vec<Field>,
}

impl<'r> FieldBuilder<'r> {
    pub fn new(registry: &'r FieldRegistry) -> Self {
        Self {
            registry,
            ignored: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// Type tags inference must skip for every node this builder creates.
    #[must_use]
    pub fn with_ignored(mut self, type_tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ignored = type_tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn registry(&self) -> &FieldRegistry {
        self.registry
    }

    /// Number of nodes built so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Builds the field for `model`.
    ///
    /// An explicit `type` in `options` wins over inference. Any failure
    /// yields an error leaf carrying the diagnostic; this never fails.
    pub fn create_field(&mut self, model: &Model, options: Option<&FieldOptions>) -> FieldId {
        self.create_field_ignoring(model, options, &[])
    }

    /// Like [`create_field`](Self::create_field), additionally skipping
    /// `ignore`d type tags during inference of this node.
    pub fn create_field_ignoring(
        &mut self,
        model: &Model,
        options: Option<&FieldOptions>,
        ignore: &[&str],
    ) -> FieldId {
        let mut annotations = Vec::new();
        let model = model.unwrap_into(&mut annotations);

        let kind = match options.and_then(|o| o.field_type.as_deref()) {
            Some(tag) => match self.registry.get(tag) {
                Some(kind) => kind,
                None => return self.error(format!("no field registered for type \"{tag}\"")),
            },
            None => {
                let mut skipped = self.ignored.clone();
                skipped.extend(ignore.iter().map(|tag| tag.to_string()));
                match self.registry.infer(model, &annotations, &skipped) {
                    Some(kind) => kind,
                    None => {
                        return self.error(format!(
                            "no field can be inferred from model of type \"{}\"",
                            model.type_name()
                        ));
                    }
                }
            }
        };

        debug!("Creating {} field for {} model", kind.type_tag(), model.type_name());
        kind.create(self, model, options)
    }

    pub(crate) fn push(&mut self, field: Field) -> FieldId {
        self.nodes.push(field);
        FieldId(self.nodes.len() - 1)
    }

    /// Pushes an error leaf.
    pub(crate) fn error(&mut self, message: String) -> FieldId {
        warn!("Field construction failed: {message}");
        self.push(Field::Error(ErrorField::new(message)))
    }

    /// Pushes an error leaf for a model `kind` cannot represent.
    pub(crate) fn mismatch(&mut self, kind: FieldKind, model: &Model) -> FieldId {
        self.error(format!(
            "expected model of type \"{}\", got \"{}\"",
            kind.type_tag(),
            model.type_name()
        ))
    }

    /// Resolves recursion labels below `root`, computes configurations and
    /// freezes the arena.
    pub fn initialize(mut self, root: FieldId) -> FieldTree {
        let mut aggregates = vec![Aggregates::default(); self.nodes.len()];
        let mut visited = vec![false; self.nodes.len()];
        self.initialize_node(root, &Bindings::new(), &mut aggregates, &mut visited);
        debug!("Initialized field tree with {} nodes", self.nodes.len());
        FieldTree::new(self.nodes, aggregates, root)
    }

    fn initialize_node(
        &mut self,
        id: FieldId,
        bindings: &Bindings,
        aggregates: &mut [Aggregates],
        visited: &mut [bool],
    ) {
        if std::mem::replace(&mut visited[id.0], true) {
            return;
        }

        match &self.nodes[id.0] {
            Field::Recursive(field) => {
                let mut scope = bindings.clone();
                scope.extend(field.members.iter().cloned());
                let members: Vec<FieldId> = field.members.iter().map(|(_, id)| *id).collect();
                let top = field.top_id();
                for member in members {
                    self.initialize_node(member, &scope, aggregates, visited);
                }
                if let Some(top) = top {
                    aggregates[id.0] = aggregates[top.0].clone();
                }
            }
            Field::Recursion(field) => {
                let mut scope = bindings.clone();
                scope.insert(field.label.clone(), field.field);
                let inner = field.field;
                self.initialize_node(inner, &scope, aggregates, visited);
                aggregates[id.0] = aggregates[inner.0].clone();
            }
            Field::Recurse(field) => match bindings.get(&field.label) {
                Some(target) => {
                    let target = *target;
                    if let Field::Recurse(field) = &mut self.nodes[id.0] {
                        field.target = Some(target);
                    }
                }
                None => {
                    let message = format!("recursion label \"{}\" is not bound", field.label);
                    warn!("Field initialization failed: {message}");
                    self.nodes[id.0] = Field::Error(ErrorField::new(message));
                }
            },
            field => {
                if let Some(leaf) = field.as_leaf() {
                    aggregates[id.0] = Aggregates {
                        sort: leaf.sort_configurations(),
                        filter: leaf.filter_configurations(),
                    };
                    return;
                }

                let children = field.children();
                for child in &children {
                    self.initialize_node(child.id, bindings, aggregates, visited);
                }
                let mut aggregate = Aggregates::default();
                for child in &children {
                    let child_aggregates = &aggregates[child.id.0];
                    if child.sortable {
                        aggregate.sort.extend(
                            child_aggregates
                                .sort
                                .iter()
                                .map(|sort| sort.prefixed(&child.prefix, &child.segment)),
                        );
                    }
                    aggregate.filter.extend(
                        child_aggregates
                            .filter
                            .iter()
                            .map(|filter| filter.prefixed(&child.prefix, &child.segment)),
                    );
                }
                aggregates[id.0] = aggregate;
            }
        }
    }
}
