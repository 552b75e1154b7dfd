//! Save and delete pipelines.
//!
//! Before a value is encoded for the store, every field gets a chance to
//! rewrite it: passwords are hashed, staged uploads committed. Composites
//! run their children's hooks one after another in child order and only
//! descend into children that have a hook at all. Hooks return a new value
//! and never mutate their input; the first error aborts the run.

use crate::context::HookContext;
use crate::error::FieldResult;
use crate::fields::Field;
use crate::tree::FieldRef;
use crate::value::{FieldData, FieldValue, ListItem, MapItem, OptionalValue, UnionValue};
use futures::future::BoxFuture;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hook {
    Save,
    Delete,
}

impl<'t> FieldRef<'t> {
    /// Whether `on_save` may change a value of this field.
    pub fn has_save_hook(self) -> bool {
        self.has_hook(Hook::Save)
    }

    /// Whether `on_delete` may act on a value of this field.
    pub fn has_delete_hook(self) -> bool {
        self.has_hook(Hook::Delete)
    }

    fn has_hook(self, hook: Hook) -> bool {
        let field = self.effective();
        match field.field() {
            Field::Password(_) => hook == Hook::Save,
            Field::Media(_) => true,
            Field::Struct(_)
            | Field::Tuple(_)
            | Field::Union(_)
            | Field::Optional(_)
            | Field::List(_)
            | Field::Map(_) => true,
            _ => false,
        }
    }

    /// Runs the save pipeline over `value`.
    pub fn on_save<'a>(self, value: &'a FieldValue, ctx: &'a HookContext) -> BoxFuture<'a, FieldResult<FieldValue>>
    where
        't: 'a,
    {
        self.run_hook(Hook::Save, value, ctx)
    }

    /// Runs the delete pipeline over `value`.
    pub fn on_delete<'a>(self, value: &'a FieldValue, ctx: &'a HookContext) -> BoxFuture<'a, FieldResult<FieldValue>>
    where
        't: 'a,
    {
        self.run_hook(Hook::Delete, value, ctx)
    }

    fn run_hook<'a>(self, hook: Hook, value: &'a FieldValue, ctx: &'a HookContext) -> BoxFuture<'a, FieldResult<FieldValue>>
    where
        't: 'a,
    {
        Box::pin(async move {
            let field = self.effective();
            let tree = field.tree;
            let data = match (field.field(), &value.value) {
                (Field::Password(f), _) if hook == Hook::Save => return f.on_save(value, ctx).await,
                (Field::Media(f), _) => {
                    return match hook {
                        Hook::Save => f.on_save(value, ctx).await,
                        Hook::Delete => f.on_delete(value, ctx).await,
                    };
                }
                (Field::Struct(f), FieldData::Struct(entries)) => {
                    let mut next = Vec::with_capacity(entries.len());
                    for (key, entry) in entries {
                        let entry = match f.child(tree, key) {
                            Some(child) => child.hook_child(hook, entry, ctx).await?,
                            None => entry.clone(),
                        };
                        next.push((key.clone(), entry));
                    }
                    FieldData::Struct(next)
                }
                (Field::Tuple(f), FieldData::Tuple(items)) => {
                    let mut next = Vec::with_capacity(items.len());
                    for (index, item) in items.iter().enumerate() {
                        let item = match f.child(tree, index) {
                            Some(child) => child.hook_child(hook, item, ctx).await?,
                            None => item.clone(),
                        };
                        next.push(item);
                    }
                    FieldData::Tuple(next)
                }
                (Field::Union(f), FieldData::Union(union)) => {
                    let Some((key, selected)) = union.selected_value() else {
                        return Ok(value.clone());
                    };
                    let Some(child) = f.child(tree, key) else {
                        return Ok(value.clone());
                    };
                    let updated = child.hook_child(hook, selected, ctx).await?;
                    FieldData::Union(UnionValue {
                        selected: union.selected.clone(),
                        values: union
                            .values
                            .iter()
                            .map(|(k, v)| {
                                let v = if k == key { updated.clone() } else { v.clone() };
                                (k.clone(), v)
                            })
                            .collect(),
                    })
                }
                (
                    Field::Optional(f),
                    FieldData::Optional(OptionalValue {
                        is_present: true,
                        value: Some(inner),
                    }),
                ) => FieldData::Optional(OptionalValue {
                    is_present: true,
                    value: Some(Box::new(f.child(tree).hook_child(hook, inner, ctx).await?)),
                }),
                (Field::List(f), FieldData::List(items)) => {
                    let child = f.child(tree);
                    let mut next = Vec::with_capacity(items.len());
                    for item in items {
                        next.push(ListItem {
                            id: item.id,
                            value: child.hook_child(hook, &item.value, ctx).await?,
                        });
                    }
                    FieldData::List(next)
                }
                (Field::Map(f), FieldData::Map(items)) => {
                    let child = f.child(tree);
                    let mut next = Vec::with_capacity(items.len());
                    for item in items {
                        next.push(MapItem {
                            id: item.id,
                            key: item.key.clone(),
                            value: child.hook_child(hook, &item.value, ctx).await?,
                        });
                    }
                    FieldData::Map(next)
                }
                _ => return Ok(value.clone()),
            };

            debug!("Ran {hook:?} hooks below {} field", field.type_tag());
            let mut next = field.validated(data);
            next.has_changes = value.has_changes;
            Ok(next)
        })
    }

    /// Runs `hook` on a child value, skipping children without one.
    async fn hook_child(self, hook: Hook, value: &FieldValue, ctx: &HookContext) -> FieldResult<FieldValue> {
        if self.has_hook(hook) {
            self.run_hook(hook, value, ctx).await
        } else {
            Ok(value.clone())
        }
    }
}
