use super::FormSyncEngine;
use super::convert::display;
use crate::metadata::{AttachmentMetadata, FormField, FormFieldSet};

impl FormSyncEngine<'_> {
    /// Add one form input per registered field to `fields`.
    ///
    /// Non-image attachments get `fields` back untouched. Absent values show
    /// up as empty inputs; shutter speed is converted to `1/N` notation.
    ///
    /// ```rust
    /// use pix_exif::fields::FieldRegistry;
    /// use pix_exif::metadata::{AttachmentMetadata, FormFieldSet};
    /// use pix_exif::sync::FormSyncEngine;
    ///
    /// let registry = FieldRegistry::default();
    /// let mut record = AttachmentMetadata::default();
    /// record.set_image_meta("shutter_speed", "0.01");
    ///
    /// let form = FormSyncEngine::new(&registry)
    ///     .build_form_field_set(true, FormFieldSet::new(), &record);
    /// assert_eq!(form.get("pix_exif_shutter_speed").unwrap().value, "1/100");
    /// assert_eq!(form.get("pix_exif_camera").unwrap().value, "");
    /// ```
    pub fn build_form_field_set(
        &self,
        is_image: bool,
        mut fields: FormFieldSet,
        metadata: &AttachmentMetadata,
    ) -> FormFieldSet {
        if !is_image {
            return fields;
        }

        for def in self.registry.fields() {
            let stored = metadata.image_meta_text(def.key);
            let value = display(def.display, &stored);
            if value != stored {
                log::debug!("{}: displaying {stored:?} as {value:?}", def.key);
            }

            fields.insert(
                self.registry.form_name(def.key),
                FormField {
                    value,
                    label: def.label.to_string(),
                    helps: def.description.to_string(),
                },
            );
        }

        fields
    }
}
