use super::{mismatch, mismatch_message, Field, FieldId, FieldInfo, LeafField};
use crate::builder::FieldBuilder;
use crate::context::{DeleteContext, SaveContext};
use crate::error::{FieldError, FieldResult};
use crate::registry::FieldKind;
use crate::value::{FieldData, FieldValue, Media, MediaValue};
use fieldkit_model::{FieldOptions, Model};
use fieldkit_types::Expression;
use serde_json::Value;
use tracing::{debug, info};

/// Annotation tag that marks a struct model as a media reference.
pub const MEDIA_ANNOTATION: &str = "field:media";

/// Uploaded file managed through the media API.
///
/// Inferred from a struct model annotated with `field:media`. New uploads
/// are staged in `uploaded` and committed by the save hook.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaField {
    pub info: FieldInfo,
}

impl MediaField {
    pub(crate) fn create(
        builder: &mut FieldBuilder<'_>,
        model: &Model,
        options: Option<&FieldOptions>,
    ) -> FieldId {
        if !matches!(model, Model::Struct { .. }) {
            return builder.mismatch(FieldKind::Media, model);
        }
        builder.push(Field::Media(Self {
            info: FieldInfo::from_options(options),
        }))
    }

    /// Commits a staged upload, or copies the media when saving a new
    /// record so the copy does not share files with its source.
    pub(crate) async fn on_save(&self, value: &FieldValue, ctx: &SaveContext) -> FieldResult<FieldValue> {
        let FieldData::Media(media) = &value.value else {
            return Ok(value.clone());
        };

        let committed = if let Some(upload) = &media.uploaded {
            let api_path = ctx.config.media_api_path()?;
            let overwrite = media.media.as_ref().map(|m| m.id.as_str());
            info!("Committing upload {} for {}", upload.id, ctx.model);
            ctx.session.commit_media(api_path, &upload.id, overwrite).await?
        } else {
            match (&media.media, &ctx.id) {
                (Some(existing), None) => {
                    let api_path = ctx.config.media_api_path()?;
                    debug!("Copying media {} into new {} record", existing.id, ctx.model);
                    ctx.session.copy_media(api_path, &existing.id).await?
                }
                _ => return Ok(value.clone()),
            }
        };

        Ok(self.with_media(value, Some(committed)))
    }

    /// Deletes the stored media.
    pub(crate) async fn on_delete(&self, value: &FieldValue, ctx: &DeleteContext) -> FieldResult<FieldValue> {
        let FieldData::Media(MediaValue {
            media: Some(existing),
            ..
        }) = &value.value
        else {
            return Ok(value.clone());
        };
        let api_path = ctx.config.media_api_path()?;
        info!("Deleting media {} of {}", existing.id, ctx.model);
        ctx.session.delete_media(api_path, &existing.id).await?;
        Ok(self.with_media(value, None))
    }

    fn with_media(&self, value: &FieldValue, media: Option<Media>) -> FieldValue {
        let data = FieldData::Media(MediaValue {
            media,
            uploaded: None,
        });
        let error = self.validate(&data);
        FieldValue {
            has_changes: value.has_changes,
            ..FieldValue::new(data, error)
        }
    }
}

impl LeafField for MediaField {
    fn kind(&self) -> FieldKind {
        FieldKind::Media
    }

    fn info(&self) -> &FieldInfo {
        &self.info
    }

    fn default_data(&self) -> FieldData {
        FieldData::Media(MediaValue::default())
    }

    fn validate(&self, data: &FieldData) -> Option<String> {
        match data {
            FieldData::Media(MediaValue {
                media: None,
                uploaded: None,
            }) => Some("no file uploaded".to_string()),
            FieldData::Media(_) => None,
            other => Some(mismatch_message("media", other)),
        }
    }

    fn decode(&self, raw: &Value) -> Result<FieldData, String> {
        match raw {
            Value::Null => Ok(self.default_data()),
            other => serde_json::from_value::<Media>(other.clone())
                .map(|media| {
                    FieldData::Media(MediaValue {
                        media: Some(media),
                        uploaded: None,
                    })
                })
                .map_err(|e| format!("invalid media: {e}")),
        }
    }

    /// Encodes committed media; staged uploads must be saved first.
    fn encode(&self, data: &FieldData) -> FieldResult<Expression> {
        match data {
            FieldData::Media(MediaValue {
                media: Some(media),
                uploaded: None,
            }) => Ok(Expression::Struct(vec![
                ("id".to_string(), Expression::String(media.id.clone())),
                ("filename".to_string(), Expression::String(media.filename.clone())),
                ("mimeType".to_string(), Expression::String(media.mime_type.clone())),
                ("url".to_string(), Expression::String(media.url.clone())),
                ("size".to_string(), Expression::Uint64(media.size)),
            ])),
            FieldData::Media(_) => Err(FieldError::InvalidValue(
                "media has not been committed".to_string(),
            )),
            other => Err(mismatch("media", other)),
        }
    }
}
