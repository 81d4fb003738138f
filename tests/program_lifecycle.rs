//! End-to-end lifecycle coverage through the session command surface.

use fieldbook::core::model::{
    Conclusion, ConclusionRating, Engagement, EngagementStatus, TestStatus,
};
use fieldbook::core::seed;
use fieldbook::engine::session::Session;

fn session_with(status: EngagementStatus, template_id: Option<&str>) -> Session {
    let engagement = Engagement {
        id: "E-01".to_string(),
        title: "Lifecycle Test".to_string(),
        status,
        template_id: template_id.map(str::to_string),
        process_owner: "Owner".to_string(),
    };
    let mut session = Session::new(vec![engagement], seed::demo_templates());
    session.select_engagement("E-01").unwrap();
    session
}

#[test]
fn full_fieldwork_pass_path() {
    let mut s = session_with(EngagementStatus::Fieldwork, Some("T-01"));
    let program = s.program().unwrap();
    assert_eq!(program.len(), 3);
    assert!(program.iter().all(|wp| wp.status == TestStatus::Pending));

    s.save_draft(1).unwrap();
    assert_eq!(s.workpaper(1).unwrap().status, TestStatus::Wip);

    // Work the first step: tick procedures, attach evidence, conclude.
    for proc_id in ["01", "02", "03"] {
        assert!(s.toggle_procedure(1, proc_id).unwrap());
    }
    s.add_required_evidence(1, "User access listing").unwrap();
    s.set_narrative(1, "No exceptions in access sample.").unwrap();
    let status = s
        .mark_complete(
            1,
            Conclusion {
                rating: ConclusionRating::Effective,
                summary: "Controls operating effectively.".to_string(),
            },
        )
        .unwrap();
    assert_eq!(status, TestStatus::Pass);

    let wp = s.workpaper(1).unwrap();
    assert_eq!(wp.status, TestStatus::Pass);
    assert_eq!(
        wp.conclusion.unwrap().rating,
        ConclusionRating::Effective
    );
}

#[test]
fn ineffective_conclusion_fails_and_finding_links_back() {
    let mut s = session_with(EngagementStatus::Fieldwork, Some("T-01"));
    let status = s
        .mark_complete(
            2,
            Conclusion {
                rating: ConclusionRating::Ineffective,
                summary: "Unauthorized changes reached production.".to_string(),
            },
        )
        .unwrap();
    assert_eq!(status, TestStatus::Fail);

    let mut draft = s.open_finding_draft(2).unwrap();
    draft.title = "Change approvals bypassed".to_string();
    let finding = s.commit_finding(2, draft).unwrap();
    assert_eq!(finding.linked_control, s.workpaper(2).unwrap().reference);

    let linked = s.linked_findings(2).unwrap();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].id, finding.id);
}

#[test]
fn reedit_after_completion_is_allowed_until_lock() {
    let mut s = session_with(EngagementStatus::Fieldwork, None);
    s.set_narrative(1, "Initial pass.").unwrap();
    s.mark_complete(
        1,
        Conclusion {
            rating: ConclusionRating::Effective,
            summary: "Fine.".to_string(),
        },
    )
    .unwrap();
    // No terminal state at the workpaper level: drafting again reopens it.
    s.save_draft(1).unwrap();
    assert_eq!(s.workpaper(1).unwrap().status, TestStatus::Wip);
}

#[test]
fn locked_engagement_program_is_frozen_exactly() {
    let mut s = session_with(EngagementStatus::Completed, Some("T-02"));
    let before = s.program().unwrap();

    assert!(s.save_draft(1).is_err());
    assert!(s.add_workpaper().is_err());
    assert!(s.delete_workpaper(1, true).is_err());
    assert!(s.move_workpaper(0, 1).is_err());
    assert!(s.set_narrative(1, "late edit").is_err());

    assert_eq!(s.program().unwrap(), before);
}

#[test]
fn program_grows_and_reorders_with_stable_references() {
    let mut s = session_with(EngagementStatus::Fieldwork, Some("T-02"));
    s.add_workpaper().unwrap();
    s.move_workpaper(0, 2).unwrap();

    let refs: Vec<String> = s
        .program()
        .unwrap()
        .iter()
        .map(|wp| wp.reference.clone())
        .collect();
    // Order changed, references did not.
    assert_eq!(refs, vec!["WP-02", "WP-03", "WP-01"]);
}

#[test]
fn findings_summary_spans_the_whole_program() {
    let mut s = session_with(EngagementStatus::Fieldwork, Some("T-01"));
    for wp_id in [1u32, 2, 3] {
        let mut draft = s.open_finding_draft(wp_id).unwrap();
        draft.title = format!("Issue on step {}", wp_id);
        s.commit_finding(wp_id, draft).unwrap();
    }
    assert_eq!(s.engagement_findings().unwrap().len(), 3);
    assert_eq!(s.linked_findings(2).unwrap().len(), 1);
}
