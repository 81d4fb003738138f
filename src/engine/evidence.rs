//! Evidence Tracker: required and uploaded evidence lists for a workpaper.
//!
//! Uploaded evidence capture is metadata only (name, human size, mime type);
//! byte transport belongs to the external storage collaborator. Uploads are
//! purely additive: no dedup and no size cap at this layer.

use crate::core::error::FieldbookError;
use crate::core::model::{EvidenceFile, WorkpaperRecord};

/// Append a required-evidence label; blank labels are rejected.
pub fn add_required_evidence(
    wp: &mut WorkpaperRecord,
    label: &str,
) -> Result<(), FieldbookError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(FieldbookError::ValidationError(
            "evidence label must not be empty".to_string(),
        ));
    }
    wp.required_evidence.push(trimmed.to_string());
    Ok(())
}

/// Remove a required-evidence entry by position.
pub fn remove_required_evidence(
    wp: &mut WorkpaperRecord,
    index: usize,
) -> Result<String, FieldbookError> {
    if index >= wp.required_evidence.len() {
        return Err(FieldbookError::NotFound(format!(
            "required evidence index {} in {}",
            index, wp.reference
        )));
    }
    Ok(wp.required_evidence.remove(index))
}

/// Append one descriptor per uploaded file.
pub fn record_uploaded_evidence(wp: &mut WorkpaperRecord, files: Vec<EvidenceFile>) {
    wp.uploaded_evidence.extend(files);
}

/// Human-readable size used in evidence descriptors (`2048` → `2.00 KB`).
pub fn display_size(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}
