//! Reordering Engine: moves a workpaper within its program.
//!
//! A reorder is a splice, not a swap: the element leaves `source` and is
//! reinserted at `dest`, preserving the relative order of everything else.
//! Drag state is a two-phase gesture consumed atomically on drop; any abort
//! path discards it and leaves the list untouched.

use crate::core::error::FieldbookError;
use crate::core::model::WorkpaperRecord;

/// Splice-move the workpaper at `source` to `dest`.
pub fn move_workpaper(
    program: &mut Vec<WorkpaperRecord>,
    source: usize,
    dest: usize,
) -> Result<(), FieldbookError> {
    if source >= program.len() || dest >= program.len() {
        return Err(FieldbookError::NotFound(format!(
            "reorder index out of range (source {}, dest {}, len {})",
            source,
            dest,
            program.len()
        )));
    }
    let moved = program.remove(source);
    program.insert(dest, moved);
    Ok(())
}

/// Tiny state machine for the two-phase drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Picked {
        source: usize,
    },
}

impl DragState {
    /// Phase one: record the source index.
    pub fn pick_up(&mut self, source: usize) {
        *self = DragState::Picked { source };
    }

    /// Phase two: consume the gesture, yielding the committed move. Returns
    /// `None` when nothing was picked up.
    pub fn drop_on(&mut self, dest: usize) -> Option<(usize, usize)> {
        match std::mem::take(self) {
            DragState::Picked { source } => Some((source, dest)),
            DragState::Idle => None,
        }
    }

    /// Abort path: discard any in-flight gesture.
    pub fn abort(&mut self) {
        *self = DragState::Idle;
    }
}
