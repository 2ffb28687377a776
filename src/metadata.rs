use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A per-attachment metadata record as kept by the host.
///
/// Only the `image_meta` section is touched by this crate. Every other key
/// (`width`, `height`, `file`, `sizes`, ...) is carried through `extra` so a
/// read-modify-write never loses host data.
///
/// ```rust
/// use pix_exif::metadata::AttachmentMetadata;
///
/// let record: AttachmentMetadata = serde_json::from_str(r#"{
///     "file": "2024/05/lake.jpg",
///     "width": 1200,
///     "image_meta": { "aperture": 2.8, "camera": "X-T4" }
/// }"#).unwrap();
///
/// assert_eq!(record.image_meta_text("aperture"), "2.8");
/// assert_eq!(record.image_meta_text("iso"), "");
/// assert_eq!(record.file(), Some("2024/05/lake.jpg"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttachmentMetadata {
    #[serde(
        default,
        deserialize_with = "image_meta_from_host",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_meta: Option<IndexMap<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AttachmentMetadata {
    /// Text of `image_meta[key]`, or an empty string when the section or key is absent.
    pub fn image_meta_text(&self, key: &str) -> String {
        self.image_meta
            .as_ref()
            .and_then(|meta| meta.get(key))
            .map(value_to_text)
            .unwrap_or_default()
    }

    /// Set `image_meta[key]`, creating the section if needed.
    pub fn set_image_meta(&mut self, key: &str, value: impl Into<String>) {
        self.image_meta
            .get_or_insert_with(IndexMap::new)
            .insert(key.to_string(), Value::String(value.into()));
    }

    /// The attachment's file path relative to the upload root, when recorded.
    pub fn file(&self) -> Option<&str> {
        self.extra.get("file").and_then(Value::as_str)
    }
}

/// `image_meta` as an object, `null`, or `[]` (how PHP hosts encode an empty map).
fn image_meta_from_host<'de, D>(deserializer: D) -> Result<Option<IndexMap<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum HostImageMeta {
        Map(IndexMap<String, Value>),
        List(Vec<Value>),
    }

    match Option::<HostImageMeta>::deserialize(deserializer)? {
        Some(HostImageMeta::Map(meta)) => Ok(Some(meta)),
        Some(HostImageMeta::List(list)) if list.is_empty() => Ok(None),
        Some(HostImageMeta::List(_)) => Err(D::Error::custom("image_meta must be an object")),
        None => Ok(None),
    }
}

/// Render a stored scalar the way it would appear in a text input.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => {
            log::debug!("Ignoring non-scalar image_meta value: {value}");
            String::new()
        }
    }
}

/// One input on the attachment edit form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub label: String,
    /// Help text shown under the input.
    #[serde(default)]
    pub helps: String,
}

/// Ordered mapping of form-field name → [`FormField`].
///
/// Insertion order is display order. Inserting an existing name replaces the
/// entry in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormFieldSet(IndexMap<String, FormField>);

impl FormFieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, field: FormField) {
        self.0.insert(name.into(), field);
    }

    pub fn get(&self, name: &str) -> Option<&FormField> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FormField)> {
        self.0.iter().map(|(name, field)| (name.as_str(), field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ── image_meta_text ──────────────────────────────────────────────

    #[test]
    fn missing_section_reads_empty() {
        let record = AttachmentMetadata::default();
        assert_eq!(record.image_meta_text("camera"), "");
    }

    #[test]
    fn missing_key_reads_empty() {
        let mut record = AttachmentMetadata::default();
        record.set_image_meta("camera", "X100V");
        assert_eq!(record.image_meta_text("iso"), "");
        assert_eq!(record.image_meta_text("camera"), "X100V");
    }

    #[test]
    fn scalar_values_render_as_text() {
        let record: AttachmentMetadata = serde_json::from_value(json!({
            "image_meta": {
                "aperture": 2.8,
                "iso": 400,
                "flag": true,
                "credit": null,
                "keywords": ["a", "b"]
            }
        }))
        .unwrap();
        assert_eq!(record.image_meta_text("aperture"), "2.8");
        assert_eq!(record.image_meta_text("iso"), "400");
        assert_eq!(record.image_meta_text("flag"), "1");
        assert_eq!(record.image_meta_text("credit"), "");
        assert_eq!(record.image_meta_text("keywords"), "");
    }

    // ── serialization ────────────────────────────────────────────────

    #[test]
    fn host_keys_survive_round_trip() {
        let raw = json!({
            "width": 4000,
            "height": 3000,
            "file": "2023/01/dunes.jpg",
            "sizes": { "thumbnail": { "file": "dunes-150x150.jpg" } },
            "image_meta": { "camera": "Canon EOS R5", "aperture": "4" }
        });
        let mut record: AttachmentMetadata = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.file(), Some("2023/01/dunes.jpg"));

        record.set_image_meta("aperture", "5.6");
        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["width"], 4000);
        assert_eq!(out["sizes"], raw["sizes"]);
        assert_eq!(out["image_meta"]["camera"], "Canon EOS R5");
        assert_eq!(out["image_meta"]["aperture"], "5.6");
    }

    #[test]
    fn absent_image_meta_is_not_serialized() {
        let record: AttachmentMetadata = serde_json::from_value(json!({ "file": "a.pdf" })).unwrap();
        let out = serde_json::to_value(&record).unwrap();
        assert!(out.get("image_meta").is_none());
    }

    #[test]
    fn empty_php_array_image_meta_reads_as_absent() {
        let record: AttachmentMetadata =
            serde_json::from_str(r#"{"file":"a.jpg","image_meta":[]}"#).unwrap();
        assert!(record.image_meta.is_none());
        assert_eq!(record.image_meta_text("camera"), "");
        assert_eq!(record.file(), Some("a.jpg"));
    }

    #[test]
    fn null_image_meta_reads_as_absent() {
        let record: AttachmentMetadata =
            serde_json::from_str(r#"{"file":"a.jpg","image_meta":null}"#).unwrap();
        assert!(record.image_meta.is_none());
    }

    #[test]
    fn non_empty_list_image_meta_is_rejected() {
        let err = serde_json::from_str::<AttachmentMetadata>(r#"{"image_meta":["x"]}"#).unwrap_err();
        assert!(err.to_string().contains("image_meta must be an object"));
    }

    #[test]
    fn writing_into_empty_php_array_creates_section() {
        let mut record: AttachmentMetadata = serde_json::from_str(r#"{"image_meta":[]}"#).unwrap();
        record.set_image_meta("iso", "100");
        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["image_meta"]["iso"], "100");
    }

    // ── FormFieldSet ─────────────────────────────────────────────────

    #[test]
    fn form_field_set_keeps_insertion_order() {
        let mut set = FormFieldSet::new();
        set.insert("b", FormField::default());
        set.insert("a", FormField::default());
        set.insert("c", FormField::default());
        let names: Vec<&str> = set.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn form_field_set_replaces_in_place() {
        let mut set = FormFieldSet::new();
        set.insert("a", FormField { value: "1".into(), ..Default::default() });
        set.insert("b", FormField::default());
        set.insert("a", FormField { value: "2".into(), ..Default::default() });
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().next().unwrap().0, "a");
        assert_eq!(set.get("a").unwrap().value, "2");
    }

    #[test]
    fn form_field_set_serializes_as_object() {
        let mut set = FormFieldSet::new();
        set.insert(
            "pix_exif_iso",
            FormField { value: "200".into(), label: "ISO".into(), helps: "The ISO speed.".into() },
        );
        let out = serde_json::to_value(&set).unwrap();
        assert_eq!(out["pix_exif_iso"]["value"], "200");
        assert_eq!(out["pix_exif_iso"]["helps"], "The ISO speed.");
    }
}
