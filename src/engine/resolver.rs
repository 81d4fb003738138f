//! Template Resolver: builds the initial audit program for an engagement.
//!
//! A template lookup miss is an expected branch, not an error. The resolver
//! never returns an empty program: without a usable template it falls back
//! to a single generic workpaper so fieldwork can start immediately.

use crate::core::model::{
    AuditTemplate, Engagement, ProcedureRecord, TestStatus, WorkpaperRecord,
};

/// Default test type for freshly synthesized workpapers.
pub const DEFAULT_TEST_TYPE: &str = "Test of Design";

/// Build the initial ordered program for `engagement` from the catalog.
pub fn resolve(engagement: &Engagement, templates: &[AuditTemplate]) -> Vec<WorkpaperRecord> {
    if let Some(template_id) = engagement.template_id.as_deref() {
        if let Some(template) = templates.iter().find(|t| t.id == template_id) {
            return template
                .steps
                .iter()
                .enumerate()
                .map(|(index, step)| {
                    let id = index as u32 + 1;
                    WorkpaperRecord {
                        id,
                        title: step.title.clone(),
                        status: TestStatus::Pending,
                        reference: WorkpaperRecord::reference_for(id),
                        test_type: DEFAULT_TEST_TYPE.to_string(),
                        objective: step.objective.clone(),
                        risk: step.risk.clone(),
                        procedures: step
                            .procedures
                            .iter()
                            .enumerate()
                            .map(|(i, text)| ProcedureRecord {
                                id: format!("{:02}", i + 1),
                                text: text.clone(),
                                completed: false,
                            })
                            .collect(),
                        required_evidence: Vec::new(),
                        uploaded_evidence: Vec::new(),
                        findings_narrative: None,
                        conclusion: None,
                    }
                })
                .collect();
        }
    }

    vec![fallback_workpaper()]
}

/// Generic single-step program used when no template applies.
fn fallback_workpaper() -> WorkpaperRecord {
    WorkpaperRecord {
        id: 1,
        title: "Policy & Governance".to_string(),
        status: TestStatus::Pending,
        reference: WorkpaperRecord::reference_for(1),
        test_type: DEFAULT_TEST_TYPE.to_string(),
        objective: "Ensure policies are up to date and approved.".to_string(),
        risk: "Outdated practices.".to_string(),
        procedures: vec![ProcedureRecord {
            id: "01".to_string(),
            text: "Review Policy Header Document.".to_string(),
            completed: false,
        }],
        required_evidence: vec!["Policy_Doc_v4.pdf".to_string()],
        uploaded_evidence: Vec::new(),
        findings_narrative: None,
        conclusion: None,
    }
}
