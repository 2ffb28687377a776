use indexmap::IndexMap;
use serde::Serialize;

use super::FormSyncEngine;
use super::convert::normalize;
use crate::metadata::AttachmentMetadata;

/// Raw values posted by the edit form, keyed by namespaced field name.
pub type FormSubmission = IndexMap<String, String>;

/// A submitted value the normalizer refused; the stored value was kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedField {
    pub key: String,
    pub input: String,
    pub reason: String,
}

/// Outcome of applying a form submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SaveReport {
    /// `false` when the attachment is not an image and nothing was touched.
    pub is_image: bool,
    /// Registry keys written to `image_meta`, in registry order.
    pub written: Vec<String>,
    pub rejected: Vec<RejectedField>,
    /// Set by the caller once the record has been handed to the store.
    pub persisted: bool,
}

impl FormSyncEngine<'_> {
    /// Normalize submitted values and write them into `record.image_meta`.
    ///
    /// Fields missing from `submitted` are left alone; an empty string is a
    /// deliberate clear and is written. Values that fail to parse leave the
    /// stored value as it was.
    pub fn apply_form_submission(
        &self,
        is_image: bool,
        submitted: &FormSubmission,
        record: AttachmentMetadata,
    ) -> AttachmentMetadata {
        self.apply_form_submission_with_report(is_image, submitted, record).0
    }

    /// Same as [`apply_form_submission`](Self::apply_form_submission), also
    /// reporting which fields were written or rejected.
    ///
    /// ```rust
    /// use pix_exif::fields::FieldRegistry;
    /// use pix_exif::metadata::AttachmentMetadata;
    /// use pix_exif::sync::{FormSubmission, FormSyncEngine};
    ///
    /// let registry = FieldRegistry::default();
    /// let mut submitted = FormSubmission::new();
    /// submitted.insert("pix_exif_aperture".into(), "14/5".into());
    /// submitted.insert("pix_exif_focal_length".into(), "abc".into());
    ///
    /// let (record, report) = FormSyncEngine::new(&registry)
    ///     .apply_form_submission_with_report(true, &submitted, AttachmentMetadata::default());
    /// assert_eq!(record.image_meta_text("aperture"), "2.8");
    /// assert_eq!(report.written, ["aperture"]);
    /// assert_eq!(report.rejected[0].key, "focal_length");
    /// ```
    pub fn apply_form_submission_with_report(
        &self,
        is_image: bool,
        submitted: &FormSubmission,
        mut record: AttachmentMetadata,
    ) -> (AttachmentMetadata, SaveReport) {
        let mut report = SaveReport {
            is_image,
            ..Default::default()
        };
        if !is_image {
            return (record, report);
        }

        for def in self.registry.fields() {
            let Some(input) = submitted.get(&self.registry.form_name(def.key)) else {
                continue;
            };

            match normalize(def.normalizer, input) {
                Ok(value) => {
                    log::debug!("{}: {input:?} -> {value:?}", def.key);
                    record.set_image_meta(def.key, value);
                    report.written.push(def.key.to_string());
                }
                Err(e) => {
                    log::warn!("{}: keeping stored value, {e}", def.key);
                    report.rejected.push(RejectedField {
                        key: def.key.to_string(),
                        input: input.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        (record, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldRegistry;
    use serde_json::json;

    fn submission(pairs: &[(&str, &str)]) -> FormSubmission {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn stored() -> AttachmentMetadata {
        serde_json::from_value(json!({
            "width": 6000,
            "file": "2022/11/falcon.jpg",
            "image_meta": {
                "camera": "Canon EOS R5",
                "aperture": "4",
                "focal_length": "500",
                "shutter_speed": "0.001",
                "iso": "1600",
                "copyright": "A. Photographer"
            }
        }))
        .unwrap()
    }

    // ── guard ────────────────────────────────────────────────────────

    #[test]
    fn non_image_returns_record_unchanged() {
        let registry = FieldRegistry::default();
        let engine = FormSyncEngine::new(&registry);
        let submitted = submission(&[("pix_exif_camera", "Leica Q2")]);

        let (record, report) = engine.apply_form_submission_with_report(false, &submitted, stored());
        assert_eq!(record, stored());
        assert!(!report.is_image);
        assert!(report.written.is_empty());
    }

    #[test]
    fn non_image_without_image_meta_gains_nothing() {
        let registry = FieldRegistry::default();
        let record: AttachmentMetadata = serde_json::from_value(json!({ "file": "brochure.pdf" })).unwrap();
        let submitted = submission(&[("pix_exif_camera", "x")]);
        let out = FormSyncEngine::new(&registry).apply_form_submission(false, &submitted, record.clone());
        assert_eq!(out, record);
    }

    // ── normalization ────────────────────────────────────────────────

    #[test]
    fn aperture_fraction_stored_as_decimal() {
        let registry = FieldRegistry::default();
        let submitted = submission(&[("pix_exif_aperture", "14/5")]);
        let record = FormSyncEngine::new(&registry).apply_form_submission(true, &submitted, stored());
        assert_eq!(record.image_meta_text("aperture"), "2.8");
    }

    #[test]
    fn camera_is_trimmed() {
        let registry = FieldRegistry::default();
        let submitted = submission(&[("pix_exif_camera", "  Nikon D850  ")]);
        let record = FormSyncEngine::new(&registry).apply_form_submission(true, &submitted, stored());
        assert_eq!(record.image_meta_text("camera"), "Nikon D850");
    }

    #[test]
    fn full_submission() {
        let registry = FieldRegistry::default();
        let submitted = submission(&[
            ("pix_exif_camera", "Sony A7 IV "),
            ("pix_exif_aperture", "2.80"),
            ("pix_exif_focal_length", "85/2"),
            ("pix_exif_shutter_speed", "1/125"),
            ("pix_exif_iso", " 100"),
        ]);
        let (record, report) =
            FormSyncEngine::new(&registry).apply_form_submission_with_report(true, &submitted, stored());

        assert_eq!(record.image_meta_text("camera"), "Sony A7 IV");
        assert_eq!(record.image_meta_text("aperture"), "2.8");
        assert_eq!(record.image_meta_text("focal_length"), "42.5");
        assert_eq!(record.image_meta_text("shutter_speed"), "0.008");
        assert_eq!(record.image_meta_text("iso"), "100");
        assert_eq!(report.written, ["camera", "aperture", "focal_length", "shutter_speed", "iso"]);
        assert!(report.rejected.is_empty());
    }

    #[test]
    fn unrelated_keys_are_preserved() {
        let registry = FieldRegistry::default();
        let submitted = submission(&[("pix_exif_iso", "200")]);
        let record = FormSyncEngine::new(&registry).apply_form_submission(true, &submitted, stored());
        assert_eq!(record.image_meta_text("copyright"), "A. Photographer");
        assert_eq!(record.extra["width"], 6000);
        assert_eq!(record.file(), Some("2022/11/falcon.jpg"));
    }

    // ── absent vs empty ──────────────────────────────────────────────

    #[test]
    fn empty_value_clears_field() {
        let registry = FieldRegistry::default();
        let submitted = submission(&[("pix_exif_camera", ""), ("pix_exif_aperture", "")]);
        let record = FormSyncEngine::new(&registry).apply_form_submission(true, &submitted, stored());
        assert_eq!(record.image_meta_text("camera"), "");
        assert_eq!(record.image_meta_text("aperture"), "");
    }

    #[test]
    fn absent_value_leaves_field() {
        let registry = FieldRegistry::default();
        let submitted = submission(&[("pix_exif_iso", "200")]);
        let (record, report) =
            FormSyncEngine::new(&registry).apply_form_submission_with_report(true, &submitted, stored());
        assert_eq!(record.image_meta_text("camera"), "Canon EOS R5");
        assert_eq!(report.written, ["iso"]);
    }

    #[test]
    fn nothing_submitted_does_not_create_image_meta() {
        let registry = FieldRegistry::default();
        let record = FormSyncEngine::new(&registry).apply_form_submission(
            true,
            &submission(&[("post_title", "Falcon")]),
            AttachmentMetadata::default(),
        );
        assert!(record.image_meta.is_none());
    }

    #[test]
    fn image_meta_created_when_missing() {
        let registry = FieldRegistry::default();
        let record = FormSyncEngine::new(&registry).apply_form_submission(
            true,
            &submission(&[("pix_exif_camera", "Ricoh GR III")]),
            AttachmentMetadata::default(),
        );
        assert_eq!(record.image_meta_text("camera"), "Ricoh GR III");
    }

    #[test]
    fn unprefixed_names_are_ignored() {
        let registry = FieldRegistry::default();
        let submitted = submission(&[("camera", "Leica M11")]);
        let record = FormSyncEngine::new(&registry).apply_form_submission(true, &submitted, stored());
        assert_eq!(record.image_meta_text("camera"), "Canon EOS R5");
    }

    // ── malformed input ──────────────────────────────────────────────

    #[test]
    fn malformed_value_keeps_prior_and_continues() {
        let registry = FieldRegistry::default();
        let submitted = submission(&[
            ("pix_exif_camera", "Canon EOS R6"),
            ("pix_exif_focal_length", "abc"),
            ("pix_exif_shutter_speed", "1/0"),
            ("pix_exif_iso", "3200"),
        ]);
        let (record, report) =
            FormSyncEngine::new(&registry).apply_form_submission_with_report(true, &submitted, stored());

        assert_eq!(record.image_meta_text("focal_length"), "500");
        assert_eq!(record.image_meta_text("shutter_speed"), "0.001");
        assert_eq!(record.image_meta_text("camera"), "Canon EOS R6");
        assert_eq!(record.image_meta_text("iso"), "3200");

        let rejected: Vec<&str> = report.rejected.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(rejected, ["focal_length", "shutter_speed"]);
        assert_eq!(report.rejected[0].input, "abc");
        assert!(report.rejected[0].reason.contains("invalid fraction format"));
    }

    #[test]
    fn malformed_value_on_missing_field_stays_absent() {
        let registry = FieldRegistry::default();
        let submitted = submission(&[("pix_exif_aperture", "f/abc")]);
        let record =
            FormSyncEngine::new(&registry).apply_form_submission(true, &submitted, AttachmentMetadata::default());
        assert!(record.image_meta.is_none());
    }

    // ── read → write round trip ──────────────────────────────────────

    #[test]
    fn unchanged_form_round_trips() {
        let registry = FieldRegistry::default();
        let engine = FormSyncEngine::new(&registry);
        let mut original = AttachmentMetadata::default();
        original.set_image_meta("camera", "Fujifilm X-T5");
        original.set_image_meta("aperture", "2.8");
        original.set_image_meta("focal_length", "23");
        original.set_image_meta("shutter_speed", "0.004");
        original.set_image_meta("iso", "160");

        let form = engine.build_form_field_set(true, Default::default(), &original);
        let submitted: FormSubmission = form
            .iter()
            .map(|(name, field)| (name.to_string(), field.value.clone()))
            .collect();
        let saved = engine.apply_form_submission(true, &submitted, original.clone());
        assert_eq!(saved, original);
    }
}
