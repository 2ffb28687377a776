use anyhow::Context;
use std::path::Path;

use super::FormSubmission;
use crate::error::{Result, SyncError};
use crate::fields::FieldRegistry;

/// Read a JSON object of submitted form values, keyed by form-field name.
pub fn read_submission_file(path: &Path) -> anyhow::Result<FormSubmission> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read form file {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse form file {}", path.display()))
}

/// Merge `FIELD=VALUE` pairs into `submitted`, later pairs winning.
///
/// `FIELD` is a registry key (`aperture`) or a form-field name
/// (`pix_exif_aperture`). The value is everything after the first `=`.
pub fn apply_assignments(
    registry: &FieldRegistry,
    submitted: &mut FormSubmission,
    assignments: &[String],
) -> Result<()> {
    for pair in assignments {
        let Some((name, value)) = pair.split_once('=') else {
            return Err(SyncError::InvalidAssignment { input: pair.clone() });
        };
        let name = name.trim();
        let form_name = registry
            .resolve_form_name(name)
            .ok_or_else(|| SyncError::UnknownField { name: name.to_string() })?;
        log::debug!("Submitting {form_name} = {value:?}");
        submitted.insert(form_name, value.to_string());
    }
    Ok(())
}
