//! Store ↔ form synchronization for the registered EXIF fields.
//!
//! - [`FormSyncEngine::build_form_field_set`] — read path, `image_meta` → edit form
//! - [`FormSyncEngine::apply_form_submission`] — write path, submitted form → `image_meta`
//! - [`read_submission_file`] / [`apply_assignments`] — assemble a [`FormSubmission`]
//!   from a JSON form file and `FIELD=VALUE` pairs
//!
//! Both paths are pure: they take and return values and never touch the
//! store themselves. [`crate::hooks::AttachmentHooks`] wires them to a
//! [`crate::hooks::MetadataStore`].

mod convert;
mod read;
mod submission;
mod write;

pub use convert::{display, exposure_to_fraction, format_decimal, normalize, parse_fraction, to_decimal_string};
pub use submission::{apply_assignments, read_submission_file};
pub use write::{FormSubmission, RejectedField, SaveReport};

use crate::fields::FieldRegistry;

/// Applies a [`FieldRegistry`]'s per-field transforms in both directions.
#[derive(Debug, Clone, Copy)]
pub struct FormSyncEngine<'a> {
    registry: &'a FieldRegistry,
}

impl<'a> FormSyncEngine<'a> {
    pub fn new(registry: &'a FieldRegistry) -> Self {
        Self { registry }
    }
}
