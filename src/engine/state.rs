//! Workpaper State Machine.
//!
//! `pending` → `wip` (save_draft) → `pass`/`fail` (mark_complete). No state
//! is terminal at the workpaper level; re-editing stays possible until the
//! parent engagement locks. Pass/fail are only reachable here, through the
//! conclusion operation: Ineffective maps to fail, every other rating to
//! pass.

use crate::core::error::FieldbookError;
use crate::core::model::{Conclusion, ConclusionRating, TestStatus, WorkpaperRecord};

/// Mark a workpaper as work-in-progress. Unconditional.
pub fn save_draft(wp: &mut WorkpaperRecord) {
    wp.status = TestStatus::Wip;
}

/// Conclude a workpaper, deriving its final status from the rating.
///
/// Rejected with state untouched when both the findings narrative and the
/// conclusion summary are blank. Idempotent for identical input.
pub fn mark_complete(
    wp: &mut WorkpaperRecord,
    conclusion: Conclusion,
) -> Result<TestStatus, FieldbookError> {
    let narrative_blank = wp
        .findings_narrative
        .as_deref()
        .map_or(true, |n| n.trim().is_empty());
    if narrative_blank && conclusion.summary.trim().is_empty() {
        return Err(FieldbookError::ValidationError(
            "missing conclusion: enter findings or a conclusion summary before completing"
                .to_string(),
        ));
    }

    let status = match conclusion.rating {
        ConclusionRating::Ineffective => TestStatus::Fail,
        ConclusionRating::Effective | ConclusionRating::NeedsImprovement => TestStatus::Pass,
    };
    wp.conclusion = Some(conclusion);
    wp.status = status;
    Ok(status)
}
