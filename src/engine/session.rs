//! Command surface for one fieldwork session.
//!
//! A `Session` owns the program store, the drag gesture state, the notice
//! log, and the externally-owned collaborator collections (engagements and
//! templates read-only, findings append-only). Commands run to completion in
//! arrival order; there is no parallel mutation path.
//!
//! Every mutating command checks the engagement lock predicate first and is
//! rejected outright when the parent engagement is in Review or Completed,
//! leaving the program untouched. Mutations clone the program out of the
//! store, apply, and `replace` it, so a failed command never leaves a
//! half-applied program behind.

use crate::core::error::FieldbookError;
use crate::core::model::{
    AuditTemplate, Conclusion, Engagement, EvidenceFile, Finding, ProcedureRecord, TestStatus,
    WorkpaperRecord,
};
use crate::core::notify::NoticeLog;
use crate::engine::finding::{self, FindingDraft};
use crate::engine::reorder::{self, DragState};
use crate::engine::store::ProgramStore;
use crate::engine::{evidence, procedure, state};

pub struct Session {
    engagements: Vec<Engagement>,
    templates: Vec<AuditTemplate>,
    store: ProgramStore,
    findings: Vec<Finding>,
    pub notices: NoticeLog,
    drag: DragState,
    selected: Option<String>,
}

impl Session {
    pub fn new(engagements: Vec<Engagement>, templates: Vec<AuditTemplate>) -> Self {
        Session {
            engagements,
            templates,
            store: ProgramStore::new(),
            findings: Vec::new(),
            notices: NoticeLog::new(),
            drag: DragState::Idle,
            selected: None,
        }
    }

    // ----- selection and read access -----

    /// Select an engagement, lazily resolving its program on first access.
    /// Selecting a locked engagement is allowed; it is simply read-only.
    pub fn select_engagement(&mut self, id: &str) -> Result<Vec<WorkpaperRecord>, FieldbookError> {
        let engagement = self
            .engagements
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| FieldbookError::NotFound(format!("engagement '{}'", id)))?;
        let program = self.store.get_or_init(&engagement, &self.templates);
        self.selected = Some(engagement.id);
        self.drag.abort();
        Ok(program)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn engagements(&self) -> &[Engagement] {
        &self.engagements
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Current program of the selected engagement.
    pub fn program(&self) -> Result<Vec<WorkpaperRecord>, FieldbookError> {
        let engagement = self.selected_engagement()?;
        self.store
            .get(&engagement.id)
            .cloned()
            .ok_or_else(|| FieldbookError::NotFound(format!("program for '{}'", engagement.id)))
    }

    pub fn workpaper(&self, wp_id: u32) -> Result<WorkpaperRecord, FieldbookError> {
        self.program()?
            .into_iter()
            .find(|wp| wp.id == wp_id)
            .ok_or_else(|| FieldbookError::NotFound(format!("workpaper {}", wp_id)))
    }

    pub fn linked_findings(&self, wp_id: u32) -> Result<Vec<Finding>, FieldbookError> {
        let engagement_id = self.selected_engagement()?.id.clone();
        let wp = self.workpaper(wp_id)?;
        Ok(finding::linked_findings(&self.findings, &engagement_id, &wp)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn engagement_findings(&self) -> Result<Vec<Finding>, FieldbookError> {
        let engagement_id = self.selected_engagement()?.id.clone();
        Ok(finding::engagement_findings(&self.findings, &engagement_id)
            .into_iter()
            .cloned()
            .collect())
    }

    // ----- workpaper lifecycle -----

    pub fn save_draft(&mut self, wp_id: u32) -> Result<(), FieldbookError> {
        self.with_workpaper(wp_id, |wp| {
            state::save_draft(wp);
            Ok(())
        })?;
        self.notices.success("Workpaper saved as Draft");
        Ok(())
    }

    pub fn mark_complete(
        &mut self,
        wp_id: u32,
        conclusion: Conclusion,
    ) -> Result<TestStatus, FieldbookError> {
        let status = self.with_workpaper(wp_id, |wp| state::mark_complete(wp, conclusion))?;
        let label = if status == TestStatus::Fail { "FAIL" } else { "PASS" };
        self.notices
            .success(format!("Workpaper marked as {}", label));
        Ok(status)
    }

    /// Record the auditor's observations; the completion gate reads these.
    pub fn set_narrative(&mut self, wp_id: u32, text: &str) -> Result<(), FieldbookError> {
        let text = text.to_string();
        self.with_workpaper(wp_id, move |wp| {
            wp.findings_narrative = if text.trim().is_empty() {
                None
            } else {
                Some(text)
            };
            Ok(())
        })
    }

    // ----- procedure editing -----

    pub fn add_procedure(&mut self, wp_id: u32) -> Result<String, FieldbookError> {
        let id = self.with_workpaper(wp_id, |wp| Ok(procedure::add_procedure(wp)))?;
        self.notices.success(format!("Procedure {} added", id));
        Ok(id)
    }

    pub fn edit_procedure_text(
        &mut self,
        wp_id: u32,
        proc_id: &str,
        text: &str,
    ) -> Result<(), FieldbookError> {
        let (proc_id, text) = (proc_id.to_string(), text.to_string());
        self.with_workpaper(wp_id, move |wp| {
            procedure::edit_procedure_text(wp, &proc_id, &text)
        })
    }

    pub fn toggle_procedure(&mut self, wp_id: u32, proc_id: &str) -> Result<bool, FieldbookError> {
        let proc_id = proc_id.to_string();
        self.with_workpaper(wp_id, move |wp| procedure::toggle_procedure(wp, &proc_id))
    }

    pub fn delete_procedure(&mut self, wp_id: u32, proc_id: &str) -> Result<(), FieldbookError> {
        let proc_id = proc_id.to_string();
        self.with_workpaper(wp_id, move |wp| procedure::delete_procedure(wp, &proc_id))
    }

    // ----- evidence -----

    pub fn add_required_evidence(
        &mut self,
        wp_id: u32,
        label: &str,
    ) -> Result<(), FieldbookError> {
        let label = label.to_string();
        self.with_workpaper(wp_id, move |wp| evidence::add_required_evidence(wp, &label))
    }

    pub fn remove_required_evidence(
        &mut self,
        wp_id: u32,
        index: usize,
    ) -> Result<String, FieldbookError> {
        self.with_workpaper(wp_id, move |wp| evidence::remove_required_evidence(wp, index))
    }

    pub fn record_uploaded_evidence(
        &mut self,
        wp_id: u32,
        files: Vec<EvidenceFile>,
    ) -> Result<usize, FieldbookError> {
        let count = files.len();
        self.with_workpaper(wp_id, move |wp| {
            evidence::record_uploaded_evidence(wp, files);
            Ok(())
        })?;
        self.notices
            .success(format!("{} evidence file(s) recorded", count));
        Ok(count)
    }

    // ----- program shape -----

    /// Append a new workpaper; id = highest existing id + 1 so references
    /// stay unique even after deletions.
    pub fn add_workpaper(&mut self) -> Result<WorkpaperRecord, FieldbookError> {
        let added = self.with_program(|program| {
            let id = program.iter().map(|wp| wp.id).max().unwrap_or(0) + 1;
            let wp = WorkpaperRecord {
                id,
                title: "New Audit Procedure".to_string(),
                status: TestStatus::Pending,
                reference: WorkpaperRecord::reference_for(id),
                test_type: "Test of Design".to_string(),
                objective: String::new(),
                risk: String::new(),
                procedures: vec![ProcedureRecord {
                    id: "01".to_string(),
                    text: String::new(),
                    completed: false,
                }],
                required_evidence: Vec::new(),
                uploaded_evidence: Vec::new(),
                findings_narrative: None,
                conclusion: None,
            };
            program.push(wp.clone());
            Ok(wp)
        })?;
        self.notices.success("New workpaper added");
        Ok(added)
    }

    /// Delete a workpaper. Requires explicit confirm intent; once confirmed
    /// the deletion is immediate and irreversible.
    pub fn delete_workpaper(&mut self, wp_id: u32, confirmed: bool) -> Result<(), FieldbookError> {
        if !confirmed {
            return Err(self.reject(FieldbookError::ValidationError(format!(
                "deleting workpaper {} requires confirmation",
                wp_id
            ))));
        }
        self.with_program(move |program| {
            let before = program.len();
            program.retain(|wp| wp.id != wp_id);
            if program.len() == before {
                return Err(FieldbookError::NotFound(format!("workpaper {}", wp_id)));
            }
            Ok(())
        })?;
        self.notices.success("Workpaper deleted");
        Ok(())
    }

    // ----- reordering -----

    pub fn pick_up(&mut self, source: usize) -> Result<(), FieldbookError> {
        self.unlocked_engagement()?;
        let len = self.program()?.len();
        if source >= len {
            return Err(self.reject(FieldbookError::NotFound(format!(
                "pick-up index {} out of range (len {})",
                source, len
            ))));
        }
        self.drag.pick_up(source);
        Ok(())
    }

    /// Commit the in-flight gesture. Returns false when nothing was picked
    /// up, in which case the program is untouched.
    pub fn drop_on(&mut self, dest: usize) -> Result<bool, FieldbookError> {
        self.unlocked_engagement()?;
        match self.drag.drop_on(dest) {
            Some((source, dest)) => {
                self.with_program(move |program| reorder::move_workpaper(program, source, dest))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn abort_drag(&mut self) {
        self.drag.abort();
    }

    /// Direct splice move, without the gesture phases.
    pub fn move_workpaper(&mut self, source: usize, dest: usize) -> Result<(), FieldbookError> {
        self.with_program(move |program| reorder::move_workpaper(program, source, dest))
    }

    // ----- findings -----

    /// Empty draft scoped to the workpaper; verifies the target exists.
    pub fn open_finding_draft(&self, wp_id: u32) -> Result<FindingDraft, FieldbookError> {
        self.workpaper(wp_id)?;
        Ok(FindingDraft::new())
    }

    pub fn commit_finding(
        &mut self,
        wp_id: u32,
        draft: FindingDraft,
    ) -> Result<Finding, FieldbookError> {
        let engagement = self.unlocked_engagement()?;
        let engagement_id = engagement.id.clone();
        let wp = self.workpaper(wp_id)?;
        let committed = match finding::commit_finding(draft, &wp, &engagement_id) {
            Ok(f) => f,
            Err(err) => return Err(self.reject(err)),
        };
        self.findings.push(committed.clone());
        self.notices.success("Finding raised successfully");
        Ok(committed)
    }

    // ----- internals -----

    fn selected_engagement(&self) -> Result<&Engagement, FieldbookError> {
        let id = self
            .selected
            .as_deref()
            .ok_or_else(|| FieldbookError::ValidationError("no engagement selected".to_string()))?;
        self.engagements
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| FieldbookError::NotFound(format!("engagement '{}'", id)))
    }

    fn unlocked_engagement(&mut self) -> Result<Engagement, FieldbookError> {
        let engagement = self.selected_engagement()?.clone();
        if engagement.status.is_locked() {
            return Err(self.reject(FieldbookError::ProgramLocked(format!(
                "engagement '{}' is read-only",
                engagement.id
            ))));
        }
        Ok(engagement)
    }

    /// Apply a mutation to a cloned program and commit it on success only.
    fn with_program<T>(
        &mut self,
        f: impl FnOnce(&mut Vec<WorkpaperRecord>) -> Result<T, FieldbookError>,
    ) -> Result<T, FieldbookError> {
        let engagement = self.unlocked_engagement()?;
        let mut program = self.store.get_or_init(&engagement, &self.templates);
        match f(&mut program) {
            Ok(value) => {
                self.store.replace(&engagement.id, program);
                Ok(value)
            }
            Err(err) => Err(self.reject(err)),
        }
    }

    fn with_workpaper<T>(
        &mut self,
        wp_id: u32,
        f: impl FnOnce(&mut WorkpaperRecord) -> Result<T, FieldbookError>,
    ) -> Result<T, FieldbookError> {
        self.with_program(move |program| {
            let wp = program
                .iter_mut()
                .find(|wp| wp.id == wp_id)
                .ok_or_else(|| FieldbookError::NotFound(format!("workpaper {}", wp_id)))?;
            f(wp)
        })
    }

    /// Surface a rejection as a transient error notice and hand it back.
    fn reject(&mut self, err: FieldbookError) -> FieldbookError {
        self.notices.error(err.to_string());
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::ConclusionRating;
    use crate::core::seed;

    fn session() -> Session {
        Session::new(seed::demo_engagements(), seed::demo_templates())
    }

    fn fieldwork_session() -> Session {
        let mut s = session();
        // A-01 uses template T-02 (two steps) and is in Fieldwork.
        s.select_engagement("A-01").unwrap();
        s
    }

    #[test]
    fn test_select_initializes_program_once() {
        let mut s = session();
        let program = s.select_engagement("A-01").unwrap();
        assert_eq!(program.len(), 2);
        s.save_draft(1).unwrap();
        // Re-selecting must return the cached, mutated program.
        let again = s.select_engagement("A-01").unwrap();
        assert_eq!(again[0].status, TestStatus::Wip);
    }

    #[test]
    fn test_unknown_engagement_is_not_found() {
        let mut s = session();
        assert!(matches!(
            s.select_engagement("Z-99"),
            Err(FieldbookError::NotFound(_))
        ));
    }

    #[test]
    fn test_locked_engagement_rejects_every_mutation() {
        let mut s = session();
        // D-01 is in Review: visible but read-only.
        let before = s.select_engagement("D-01").unwrap();

        assert!(matches!(s.save_draft(1), Err(FieldbookError::ProgramLocked(_))));
        assert!(s
            .mark_complete(
                1,
                Conclusion {
                    rating: ConclusionRating::Effective,
                    summary: "done".to_string()
                }
            )
            .is_err());
        assert!(s.add_procedure(1).is_err());
        assert!(s.add_required_evidence(1, "log").is_err());
        assert!(s.add_workpaper().is_err());
        assert!(s.delete_workpaper(1, true).is_err());
        assert!(s.move_workpaper(0, 1).is_err());
        assert!(s.pick_up(0).is_err());
        let mut draft = FindingDraft::new();
        draft.title = "Issue".to_string();
        assert!(s.commit_finding(1, draft).is_err());

        // Exact equality, including ordering.
        assert_eq!(s.program().unwrap(), before);
    }

    #[test]
    fn test_rejection_pushes_error_notice() {
        let mut s = session();
        s.select_engagement("D-01").unwrap();
        let _ = s.save_draft(1);
        let last = s.notices.latest().unwrap();
        assert!(last.message.contains("read-only"));
    }

    #[test]
    fn test_mark_complete_requires_narrative_or_summary() {
        let mut s = fieldwork_session();
        let err = s.mark_complete(
            1,
            Conclusion {
                rating: ConclusionRating::Effective,
                summary: String::new(),
            },
        );
        assert!(err.is_err());
        assert_eq!(s.workpaper(1).unwrap().status, TestStatus::Pending);

        s.set_narrative(1, "No exceptions in sample of 25.").unwrap();
        let status = s
            .mark_complete(
                1,
                Conclusion {
                    rating: ConclusionRating::Effective,
                    summary: String::new(),
                },
            )
            .unwrap();
        assert_eq!(status, TestStatus::Pass);
    }

    #[test]
    fn test_add_workpaper_extends_references() {
        let mut s = fieldwork_session();
        let wp = s.add_workpaper().unwrap();
        assert_eq!(wp.id, 3);
        assert_eq!(wp.reference, "WP-03");
        assert_eq!(wp.status, TestStatus::Pending);
        assert_eq!(s.program().unwrap().len(), 3);
    }

    #[test]
    fn test_delete_workpaper_requires_confirmation() {
        let mut s = fieldwork_session();
        assert!(matches!(
            s.delete_workpaper(1, false),
            Err(FieldbookError::ValidationError(_))
        ));
        assert_eq!(s.program().unwrap().len(), 2);
        s.delete_workpaper(1, true).unwrap();
        assert_eq!(s.program().unwrap().len(), 1);
    }

    #[test]
    fn test_references_stay_unique_after_delete_then_add() {
        let mut s = fieldwork_session();
        s.delete_workpaper(1, true).unwrap();
        let wp = s.add_workpaper().unwrap();
        // New ids extend past the surviving maximum, so WP-02 is not duplicated.
        assert_eq!(wp.id, 3);
        let refs: Vec<_> = s
            .program()
            .unwrap()
            .iter()
            .map(|wp| wp.reference.clone())
            .collect();
        assert_eq!(refs, vec!["WP-02", "WP-03"]);
    }

    #[test]
    fn test_drag_gesture_reorders_program() {
        let mut s = fieldwork_session();
        s.add_workpaper().unwrap();
        let before: Vec<u32> = s.program().unwrap().iter().map(|wp| wp.id).collect();
        assert_eq!(before, vec![1, 2, 3]);

        s.pick_up(0).unwrap();
        assert!(s.drop_on(2).unwrap());
        let after: Vec<u32> = s.program().unwrap().iter().map(|wp| wp.id).collect();
        assert_eq!(after, vec![2, 3, 1]);
    }

    #[test]
    fn test_aborted_gesture_leaves_program_unchanged() {
        let mut s = fieldwork_session();
        let before = s.program().unwrap();
        s.pick_up(1).unwrap();
        s.abort_drag();
        assert!(!s.drop_on(0).unwrap());
        assert_eq!(s.program().unwrap(), before);
    }

    #[test]
    fn test_commit_finding_visible_via_linked_view() {
        let mut s = fieldwork_session();
        let mut draft = s.open_finding_draft(2).unwrap();
        draft.title = "Shift reports not reviewed".to_string();
        let committed = s.commit_finding(2, draft).unwrap();

        let linked = s.linked_findings(2).unwrap();
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].id, committed.id);
        assert_eq!(linked[0].linked_control, s.workpaper(2).unwrap().reference);
        assert!(s.linked_findings(1).unwrap().is_empty());
        assert_eq!(s.engagement_findings().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_finding_title_is_a_no_op() {
        let mut s = fieldwork_session();
        let draft = s.open_finding_draft(1).unwrap();
        assert!(s.commit_finding(1, draft).is_err());
        assert!(s.findings().is_empty());
    }

    #[test]
    fn test_evidence_round_trip() {
        let mut s = fieldwork_session();
        s.add_required_evidence(1, "Utilization report").unwrap();
        assert!(s.add_required_evidence(1, "  ").is_err());
        assert_eq!(s.workpaper(1).unwrap().required_evidence.len(), 1);

        s.record_uploaded_evidence(
            1,
            vec![EvidenceFile {
                name: "shift_report.xlsx".to_string(),
                size_display: "12.40 KB".to_string(),
                mime_type: "application/vnd.ms-excel".to_string(),
            }],
        )
        .unwrap();
        assert_eq!(s.workpaper(1).unwrap().uploaded_evidence.len(), 1);

        let removed = s.remove_required_evidence(1, 0).unwrap();
        assert_eq!(removed, "Utilization report");
    }

    #[test]
    fn test_procedure_commands_route_by_id() {
        let mut s = fieldwork_session();
        let new_id = s.add_procedure(1).unwrap();
        s.edit_procedure_text(1, &new_id, "Inspect batch records.")
            .unwrap();
        assert!(s.toggle_procedure(1, &new_id).unwrap());
        s.delete_procedure(1, &new_id).unwrap();
        assert!(matches!(
            s.delete_procedure(1, &new_id),
            Err(FieldbookError::NotFound(_))
        ));
    }

    #[test]
    fn test_failed_mutation_leaves_program_unchanged() {
        let mut s = fieldwork_session();
        let before = s.program().unwrap();
        assert!(s.edit_procedure_text(1, "99", "nope").is_err());
        assert!(s.move_workpaper(0, 9).is_err());
        assert_eq!(s.program().unwrap(), before);
    }
}
