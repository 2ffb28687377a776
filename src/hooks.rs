//! Host-facing event handlers and the collaborators they depend on.
//!
//! The host owns attachment metadata persistence and knows which attachments
//! are images. Both are injected into [`AttachmentHooks`] as trait objects so
//! the handlers can run against any store, including in-memory fakes.

use anyhow::{Context, Result};

use crate::fields::FieldRegistry;
use crate::metadata::{AttachmentMetadata, FormFieldSet};
use crate::sync::{FormSubmission, FormSyncEngine, SaveReport};

/// Host-provided attachment metadata persistence.
pub trait MetadataStore {
    /// The attachment's metadata record, or `None` if the host has none.
    fn get_metadata(&self, attachment_id: u64) -> Result<Option<AttachmentMetadata>>;
    /// Replace the attachment's metadata record.
    fn update_metadata(&mut self, attachment_id: u64, record: &AttachmentMetadata) -> Result<()>;
}

/// Host-provided attachment type predicate.
pub trait AttachmentTypes {
    fn is_image_attachment(&self, attachment_id: u64) -> bool;
}

/// Handlers for the host's "edit attachment" and "save attachment" events.
///
/// # Example
///
/// ```rust
/// use pix_exif::fields::FieldRegistry;
/// use pix_exif::hooks::{AttachmentHooks, AttachmentTypes, MetadataStore};
/// use pix_exif::metadata::{AttachmentMetadata, FormFieldSet};
/// use pix_exif::sync::FormSubmission;
/// use std::collections::HashMap;
///
/// #[derive(Default)]
/// struct MemoryStore(HashMap<u64, AttachmentMetadata>);
///
/// impl MetadataStore for MemoryStore {
///     fn get_metadata(&self, id: u64) -> anyhow::Result<Option<AttachmentMetadata>> {
///         Ok(self.0.get(&id).cloned())
///     }
///     fn update_metadata(&mut self, id: u64, record: &AttachmentMetadata) -> anyhow::Result<()> {
///         self.0.insert(id, record.clone());
///         Ok(())
///     }
/// }
///
/// struct AllImages;
/// impl AttachmentTypes for AllImages {
///     fn is_image_attachment(&self, _id: u64) -> bool { true }
/// }
///
/// # fn main() -> anyhow::Result<()> {
/// let registry = FieldRegistry::default();
/// let mut store = MemoryStore::default();
/// let mut hooks = AttachmentHooks::new(&registry, &mut store, &AllImages);
///
/// let mut submitted = FormSubmission::new();
/// submitted.insert("pix_exif_shutter_speed".into(), "1/100".into());
/// hooks.fields_to_save(7, &submitted)?;
///
/// let form = hooks.fields_to_edit(7, FormFieldSet::new())?;
/// assert_eq!(form.get("pix_exif_shutter_speed").unwrap().value, "1/100");
/// # Ok(())
/// # }
/// ```
pub struct AttachmentHooks<'a> {
    engine: FormSyncEngine<'a>,
    store: &'a mut dyn MetadataStore,
    types: &'a dyn AttachmentTypes,
}

impl<'a> AttachmentHooks<'a> {
    pub fn new(
        registry: &'a FieldRegistry,
        store: &'a mut dyn MetadataStore,
        types: &'a dyn AttachmentTypes,
    ) -> Self {
        Self {
            engine: FormSyncEngine::new(registry),
            store,
            types,
        }
    }

    /// Edit event: add the EXIF inputs to the host's form fields.
    pub fn fields_to_edit(&self, attachment_id: u64, fields: FormFieldSet) -> Result<FormFieldSet> {
        if !self.types.is_image_attachment(attachment_id) {
            log::debug!("Attachment {attachment_id} is not an image, leaving form as is");
            return Ok(fields);
        }

        let record = self.load(attachment_id)?;
        Ok(self.engine.build_form_field_set(true, fields, &record))
    }

    /// Save event: normalize the submitted EXIF inputs and persist them.
    ///
    /// The record is written back even when some fields were rejected, so
    /// the valid edits in the same submission are kept.
    pub fn fields_to_save(&mut self, attachment_id: u64, submitted: &FormSubmission) -> Result<SaveReport> {
        let Some((record, mut report)) = self.preview_save(attachment_id, submitted)? else {
            return Ok(SaveReport::default());
        };

        self.store
            .update_metadata(attachment_id, &record)
            .with_context(|| format!("Failed to update metadata for attachment {attachment_id}"))?;
        report.persisted = true;
        log::info!(
            "Attachment {attachment_id}: saved {} field(s), rejected {}",
            report.written.len(),
            report.rejected.len()
        );

        Ok(report)
    }

    /// The record [`fields_to_save`](Self::fields_to_save) would write,
    /// without calling `update_metadata`. `None` for non-image attachments.
    pub fn preview_save(
        &self,
        attachment_id: u64,
        submitted: &FormSubmission,
    ) -> Result<Option<(AttachmentMetadata, SaveReport)>> {
        if !self.types.is_image_attachment(attachment_id) {
            log::debug!("Attachment {attachment_id} is not an image, nothing to save");
            return Ok(None);
        }

        let record = self.load(attachment_id)?;
        Ok(Some(self.engine.apply_form_submission_with_report(true, submitted, record)))
    }

    fn load(&self, attachment_id: u64) -> Result<AttachmentMetadata> {
        let record = self
            .store
            .get_metadata(attachment_id)
            .with_context(|| format!("Failed to read metadata for attachment {attachment_id}"))?;
        Ok(record.unwrap_or_else(|| {
            log::debug!("Attachment {attachment_id} has no metadata record yet");
            AttachmentMetadata::default()
        }))
    }
}
