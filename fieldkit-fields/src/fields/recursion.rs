use super::{inherited_options, Field, FieldId, FieldInfo};
use crate::builder::FieldBuilder;
use crate::registry::FieldKind;
use crate::tree::FieldTree;
use fieldkit_model::{FieldOptions, Model};
use fieldkit_types::KeySegment;

/// Group of mutually recursive members; behaves as its `top` member.
#[derive(Debug, Clone, PartialEq)]
pub struct RecursiveField {
    pub info: FieldInfo,
    pub top: String,
    pub members: Vec<(String, FieldId)>,
}

impl RecursiveField {
    pub(crate) fn create(
        builder: &mut FieldBuilder<'_>,
        model: &Model,
        options: Option<&FieldOptions>,
    ) -> FieldId {
        let Model::Recursive { top, models } = model else {
            return builder.mismatch(FieldKind::Recursive, model);
        };
        if !models.iter().any(|(label, _)| label == top) {
            return builder.error(format!("recursive top \"{top}\" is not a member"));
        }
        let members = models
            .iter()
            .map(|(label, member)| {
                let member_options = options.and_then(|o| o.child_by_key(label));
                (label.clone(), builder.create_field(member, member_options))
            })
            .collect();
        builder.push(Field::Recursive(Self {
            info: FieldInfo::from_options(options),
            top: top.clone(),
            members,
        }))
    }

    pub fn top_id(&self) -> Option<FieldId> {
        self.members
            .iter()
            .find(|(label, _)| *label == self.top)
            .map(|(_, id)| *id)
    }

    pub(crate) fn options(&self, tree: &FieldTree) -> FieldOptions {
        FieldOptions {
            fields: Some(
                self.members
                    .iter()
                    .map(|(label, id)| (KeySegment::Key(label.clone()), tree.get(*id).options()))
                    .collect(),
            ),
            ..self.info.to_options(FieldKind::Recursive)
        }
    }
}

/// Introduces `label` for its child; behaves as the child.
#[derive(Debug, Clone, PartialEq)]
pub struct RecursionField {
    pub info: FieldInfo,
    pub label: String,
    pub field: FieldId,
}

impl RecursionField {
    pub(crate) fn create(
        builder: &mut FieldBuilder<'_>,
        model: &Model,
        options: Option<&FieldOptions>,
    ) -> FieldId {
        let Model::Recursion { label, model: inner } = model else {
            return builder.mismatch(FieldKind::Recursion, model);
        };
        let child_options = inherited_options(options);
        let field = builder.create_field(inner, Some(&child_options));
        builder.push(Field::Recursion(Self {
            info: FieldInfo::from_options(options),
            label: label.clone(),
            field,
        }))
    }

    pub(crate) fn options(&self, tree: &FieldTree) -> FieldOptions {
        FieldOptions {
            field: Some(Box::new(tree.get(self.field).options())),
            ..self.info.to_options(FieldKind::Recursion)
        }
    }
}

/// Back-reference to the field bound to `label` by an enclosing recursion.
///
/// `target` stays empty until the tree is initialized; a label that no
/// ancestor binds turns the node into an error leaf instead.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurseField {
    pub label: String,
    pub target: Option<FieldId>,
}

impl RecurseField {
    pub(crate) fn create(builder: &mut FieldBuilder<'_>, model: &Model) -> FieldId {
        let Model::Recurse { label } = model else {
            return builder.mismatch(FieldKind::Recurse, model);
        };
        builder.push(Field::Recurse(Self {
            label: label.clone(),
            target: None,
        }))
    }
}
