//! Finding Linker: raises issues against a workpaper and reads them back.
//!
//! Findings are emitted into the externally-owned findings collection; this
//! module only constructs them and filters views. The link back to the
//! originating test step is the workpaper's reference code.

use crate::core::error::FieldbookError;
use crate::core::model::{Finding, FindingStatus, FindingType, RiskRating, WorkpaperRecord};
use crate::core::time;

/// Draft of a finding being raised against one workpaper.
#[derive(Debug, Clone)]
pub struct FindingDraft {
    pub title: String,
    pub description: String,
    pub risk: RiskRating,
    pub kind: FindingType,
    pub root_cause: String,
    pub impact: String,
    pub recommendation: String,
    pub management_response: String,
    pub action_plan: String,
}

impl FindingDraft {
    /// Empty draft scoped to a workpaper, medium risk by default.
    pub fn new() -> Self {
        FindingDraft {
            title: String::new(),
            description: String::new(),
            risk: RiskRating::Medium,
            kind: FindingType::Finding,
            root_cause: String::new(),
            impact: String::new(),
            recommendation: String::new(),
            management_response: String::new(),
            action_plan: String::new(),
        }
    }
}

impl Default for FindingDraft {
    fn default() -> Self {
        Self::new()
    }
}

/// Materialize a draft into a Finding linked to `wp`.
///
/// An empty title blocks the commit and nothing is emitted.
pub fn commit_finding(
    draft: FindingDraft,
    wp: &WorkpaperRecord,
    engagement_id: &str,
) -> Result<Finding, FieldbookError> {
    if draft.title.trim().is_empty() {
        return Err(FieldbookError::ValidationError(
            "finding title must not be empty".to_string(),
        ));
    }
    let root_cause = if draft.root_cause.trim().is_empty() {
        "To be determined".to_string()
    } else {
        draft.root_cause
    };
    Ok(Finding {
        id: time::new_finding_id(),
        engagement_id: engagement_id.to_string(),
        title: draft.title,
        description: draft.description,
        risk_rating: draft.risk,
        status: FindingStatus::Open,
        kind: draft.kind,
        identified_date: time::now_epoch_z(),
        linked_control: wp.reference.clone(),
        root_cause,
        impact: draft.impact,
        recommendation: draft.recommendation,
        management_response: draft.management_response,
        action_plan: draft.action_plan,
    })
}

/// Findings raised from `wp` within one engagement.
pub fn linked_findings<'a>(
    findings: &'a [Finding],
    engagement_id: &str,
    wp: &WorkpaperRecord,
) -> Vec<&'a Finding> {
    findings
        .iter()
        .filter(|f| f.engagement_id == engagement_id && f.linked_control == wp.reference)
        .collect()
}

/// All findings for the engagement, for the program-wide summary view.
pub fn engagement_findings<'a>(findings: &'a [Finding], engagement_id: &str) -> Vec<&'a Finding> {
    findings
        .iter()
        .filter(|f| f.engagement_id == engagement_id)
        .collect()
}
