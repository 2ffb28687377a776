//! The fixed set of EXIF fields exposed on the attachment edit form.
//!
//! A [`FieldRegistry`] is the single source of truth for which `image_meta`
//! keys are editable, how they are labelled, and which conversions apply when
//! a value travels store → form ([`DisplayTransform`]) and form → store
//! ([`Normalizer`]).

/// Default namespace token prepended to registry keys to build form-field names.
pub const DEFAULT_FIELD_PREFIX: &str = "pix_exif_";

/// Conversion applied to a submitted value before it is written to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalizer {
    /// Stored verbatim.
    None,
    /// Leading and trailing whitespace removed.
    Trim,
    /// `f/` prefix dropped, fraction → decimal, rounded to two places.
    Aperture,
    /// Fraction → decimal, rendered without rounding.
    FractionToDecimalString,
}

/// Conversion applied to a stored value before it is shown on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayTransform {
    None,
    /// Decimal exposure time shown as `1/N` (e.g. `0.01` → `1/100`).
    ExposureToFraction,
}

/// One editable EXIF field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    /// Key under `image_meta` (e.g. `"aperture"`).
    pub key: &'static str,
    pub label: &'static str,
    /// Help text rendered next to the form input.
    pub description: &'static str,
    pub normalizer: Normalizer,
    pub display: DisplayTransform,
}

/// Ordered, immutable registry of editable fields plus the form namespace.
///
/// # Example
///
/// ```rust
/// use pix_exif::fields::FieldRegistry;
///
/// let registry = FieldRegistry::default();
/// assert_eq!(registry.form_name("aperture"), "pix_exif_aperture");
/// assert_eq!(registry.key_for_form_name("pix_exif_iso"), Some("iso"));
/// ```
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    prefix: String,
    fields: Vec<FieldDefinition>,
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_FIELD_PREFIX)
    }
}

impl FieldRegistry {
    /// The standard five camera fields under a custom form namespace.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            fields: vec![
                FieldDefinition {
                    key: "camera",
                    label: "Camera",
                    description: "Camera model.",
                    normalizer: Normalizer::Trim,
                    display: DisplayTransform::None,
                },
                FieldDefinition {
                    key: "aperture",
                    label: "Aperture",
                    description: "The aperture f-stop (only the number, without f/).",
                    normalizer: Normalizer::Aperture,
                    display: DisplayTransform::None,
                },
                FieldDefinition {
                    key: "focal_length",
                    label: "Focal Length",
                    description: "The focal length that the image was shot with (in mm).",
                    normalizer: Normalizer::FractionToDecimalString,
                    display: DisplayTransform::None,
                },
                FieldDefinition {
                    key: "shutter_speed",
                    label: "Shutter Speed",
                    description: "The exposure time in fractional format (ie. 1/100).",
                    normalizer: Normalizer::FractionToDecimalString,
                    display: DisplayTransform::ExposureToFraction,
                },
                FieldDefinition {
                    key: "iso",
                    label: "ISO",
                    description: "The ISO speed.",
                    normalizer: Normalizer::Trim,
                    display: DisplayTransform::None,
                },
            ],
        }
    }

    /// All fields, in display order.
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn lookup(&self, key: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Namespaced form-field name for a registry key.
    pub fn form_name(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }

    /// Registry key for a namespaced form-field name, if it names a known field.
    pub fn key_for_form_name(&self, name: &str) -> Option<&'static str> {
        let key = name.strip_prefix(self.prefix.as_str())?;
        self.lookup(key).map(|f| f.key)
    }

    /// Form-field name for either a namespaced name or a bare registry key.
    pub fn resolve_form_name(&self, name: &str) -> Option<String> {
        if self.key_for_form_name(name).is_some() {
            Some(name.to_string())
        } else {
            self.lookup(name).map(|f| self.form_name(f.key))
        }
    }
}
