//! # pix-exif
//!
//! Edit the camera EXIF fields (camera, aperture, focal length, shutter speed, ISO)
//! of image attachments from a host's attachment edit form, and write the edits
//! back into the host's attachment metadata with the host's normalization rules.
//!
//! EXIF is not read from image files here: the host has already parsed it into the
//! `image_meta` section of each attachment's metadata record. This crate only
//! redisplays and edits those values.
//!
//! ## Quick Start
//!
//! The pure read and write paths work on values and never touch storage:
//!
//! ```rust
//! use pix_exif::fields::FieldRegistry;
//! use pix_exif::metadata::{AttachmentMetadata, FormFieldSet};
//! use pix_exif::sync::{FormSubmission, FormSyncEngine};
//!
//! let registry = FieldRegistry::default();
//! let engine = FormSyncEngine::new(&registry);
//!
//! // Store → form
//! let mut record = AttachmentMetadata::default();
//! record.set_image_meta("shutter_speed", "0.01");
//! let form = engine.build_form_field_set(true, FormFieldSet::new(), &record);
//! assert_eq!(form.get("pix_exif_shutter_speed").unwrap().value, "1/100");
//!
//! // Form → store
//! let mut submitted = FormSubmission::new();
//! submitted.insert("pix_exif_aperture".into(), "14/5".into());
//! submitted.insert("pix_exif_camera".into(), "  Nikon D850  ".into());
//! let record = engine.apply_form_submission(true, &submitted, record);
//! assert_eq!(record.image_meta_text("aperture"), "2.8");
//! assert_eq!(record.image_meta_text("camera"), "Nikon D850");
//! ```
//!
//! To wire the paths to real storage, implement [`hooks::MetadataStore`] and
//! [`hooks::AttachmentTypes`] and drive an [`hooks::AttachmentHooks`] from the
//! host's edit/save events. [`store::JsonFileStore`] is a ready-made
//! implementation over a directory of JSON records.
//!
//! ## Field rules
//!
//! | Field | Shown as | Saved as |
//! |-------|----------|----------|
//! | `camera` | stored text | trimmed text |
//! | `aperture` | stored text | decimal rounded to 2 places (`f/` prefix and fractions accepted) |
//! | `focal_length` | stored text | decimal (fractions accepted) |
//! | `shutter_speed` | `1/N` | decimal seconds (fractions accepted) |
//! | `iso` | stored text | trimmed text |
//!
//! ## Modules
//!
//! - [`fields`] — the field registry and per-field transform kinds
//! - [`sync`] — read/write paths and the value conversions
//! - [`metadata`] — attachment metadata records and form field sets
//! - [`hooks`] — host collaborator traits and the edit/save event handlers
//! - [`store`] — JSON file metadata store
//! - [`config`] — configuration types and loading/saving

pub mod config;
pub mod error;
pub mod fields;
pub mod hooks;
pub mod metadata;
pub mod store;
pub mod sync;

pub use error::SyncError;
