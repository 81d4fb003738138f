//! Procedure List Editor: CRUD over the test steps inside one workpaper.
//!
//! Id policy: monotonic, never reused. A new procedure takes
//! max(existing numeric ids) + 1, zero-padded to two digits, so delete/add
//! cycles never produce duplicate ids and surviving ids are not renumbered.

use crate::core::error::FieldbookError;
use crate::core::model::{ProcedureRecord, WorkpaperRecord};

/// Append a new empty procedure and return its assigned id.
pub fn add_procedure(wp: &mut WorkpaperRecord) -> String {
    let next = wp
        .procedures
        .iter()
        .filter_map(|p| p.id.parse::<u32>().ok())
        .max()
        .unwrap_or(0)
        + 1;
    let id = format!("{:02}", next);
    wp.procedures.push(ProcedureRecord {
        id: id.clone(),
        text: String::new(),
        completed: false,
    });
    id
}

/// Replace the text of the procedure with `proc_id`.
pub fn edit_procedure_text(
    wp: &mut WorkpaperRecord,
    proc_id: &str,
    text: &str,
) -> Result<(), FieldbookError> {
    let proc = find_mut(wp, proc_id)?;
    proc.text = text.to_string();
    Ok(())
}

/// Flip the completion flag of the procedure with `proc_id`.
pub fn toggle_procedure(wp: &mut WorkpaperRecord, proc_id: &str) -> Result<bool, FieldbookError> {
    let proc = find_mut(wp, proc_id)?;
    proc.completed = !proc.completed;
    Ok(proc.completed)
}

/// Remove the procedure with `proc_id`; remaining ids keep their gaps.
pub fn delete_procedure(wp: &mut WorkpaperRecord, proc_id: &str) -> Result<(), FieldbookError> {
    let before = wp.procedures.len();
    wp.procedures.retain(|p| p.id != proc_id);
    if wp.procedures.len() == before {
        return Err(not_found(wp, proc_id));
    }
    Ok(())
}

fn find_mut<'a>(
    wp: &'a mut WorkpaperRecord,
    proc_id: &str,
) -> Result<&'a mut ProcedureRecord, FieldbookError> {
    let reference = wp.reference.clone();
    wp.procedures
        .iter_mut()
        .find(|p| p.id == proc_id)
        .ok_or_else(|| {
            FieldbookError::NotFound(format!("procedure '{}' in {}", proc_id, reference))
        })
}

fn not_found(wp: &WorkpaperRecord, proc_id: &str) -> FieldbookError {
    FieldbookError::NotFound(format!("procedure '{}' in {}", proc_id, wp.reference))
}
