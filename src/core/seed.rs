//! Built-in demo catalog so the shell runs without external catalog files.
//!
//! Production deployments supply the engagement collection and template
//! catalog as JSON files; this seed mirrors a small slice of that shape.

use crate::core::model::{
    AuditTemplate, Engagement, EngagementStatus, RiskProfile, TemplateStep,
};

pub fn demo_templates() -> Vec<AuditTemplate> {
    vec![
        AuditTemplate {
            id: "T-01".to_string(),
            name: "IT General Controls (ITGC)".to_string(),
            description:
                "Standard framework for auditing IT infrastructure, access control, and change management."
                    .to_string(),
            risk_profile: RiskProfile::High,
            steps: vec![
                TemplateStep {
                    title: "Logical Access Management".to_string(),
                    objective: "Ensure access is restricted to authorized users.".to_string(),
                    risk: "Unauthorized access leading to data leakage.".to_string(),
                    procedures: vec![
                        "Review new joiner access requests for approval.".to_string(),
                        "Verify termination process revokes access within 24 hours.".to_string(),
                        "Review periodic user access rights recertification.".to_string(),
                    ],
                },
                TemplateStep {
                    title: "Change Management".to_string(),
                    objective: "Verify changes to production are authorized and tested.".to_string(),
                    risk: "System instability or unauthorized code changes.".to_string(),
                    procedures: vec![
                        "Sample 10 changes and trace to CAB approval.".to_string(),
                        "Verify segregation of duties between dev and prod.".to_string(),
                    ],
                },
                TemplateStep {
                    title: "Backup & Recovery".to_string(),
                    objective: "Ensure data availability and recoverability.".to_string(),
                    risk: "Data loss due to system failure.".to_string(),
                    procedures: vec![
                        "Review backup logs for the last 30 days.".to_string(),
                        "Verify successful restoration test within the last year.".to_string(),
                    ],
                },
            ],
        },
        AuditTemplate {
            id: "T-02".to_string(),
            name: "Operational Efficiency Review".to_string(),
            description:
                "Generic program for assessing process efficiency in manufacturing or logistics."
                    .to_string(),
            risk_profile: RiskProfile::Medium,
            steps: vec![
                TemplateStep {
                    title: "Process Design & Workflow".to_string(),
                    objective: "Evaluate the efficiency of current workflows.".to_string(),
                    risk: "Inefficient processes causing bottlenecks.".to_string(),
                    procedures: vec![
                        "Map current state process flow.".to_string(),
                        "Identify non-value-added steps.".to_string(),
                        "Compare metrics against industry benchmarks.".to_string(),
                    ],
                },
                TemplateStep {
                    title: "Resource Utilization".to_string(),
                    objective: "Assess if resources are deployed effectively.".to_string(),
                    risk: "Waste of labor or material resources.".to_string(),
                    procedures: vec![
                        "Analyze shift utilization reports.".to_string(),
                        "Review overtime costs vs production output.".to_string(),
                    ],
                },
            ],
        },
    ]
}

pub fn demo_engagements() -> Vec<Engagement> {
    vec![
        Engagement {
            id: "A-01".to_string(),
            title: "Production Operations, Engineering & Technical".to_string(),
            status: EngagementStatus::Fieldwork,
            template_id: Some("T-02".to_string()),
            process_owner: "Plant Manager".to_string(),
        },
        Engagement {
            id: "B-01".to_string(),
            title: "Sales & Marketing".to_string(),
            status: EngagementStatus::Fieldwork,
            template_id: None,
            process_owner: "Head of Sales".to_string(),
        },
        Engagement {
            id: "C-01".to_string(),
            title: "IT Infrastructure & Security".to_string(),
            status: EngagementStatus::Planned,
            template_id: Some("T-01".to_string()),
            process_owner: "Head of IT".to_string(),
        },
        Engagement {
            id: "D-01".to_string(),
            title: "Finance & Treasury".to_string(),
            status: EngagementStatus::Review,
            template_id: Some("T-01".to_string()),
            process_owner: "CFO".to_string(),
        },
        Engagement {
            id: "D-02".to_string(),
            title: "Human Resource Management".to_string(),
            status: EngagementStatus::Completed,
            template_id: None,
            process_owner: "HR Director".to_string(),
        },
    ]
}
