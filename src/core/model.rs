//! Shared data model for the fieldwork execution engine.
//!
//! Everything here is plain data: the engine modules under [`crate::engine`]
//! own the behavior. External collaborators (template catalog, engagement
//! collection, findings collection) exchange these types as JSON.

use serde::{Deserialize, Serialize};

/// Risk rating shared by templates, engagements, and findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskRating {
    High,
    Medium,
    Low,
}

/// Template applicability band. `All` templates match any engagement risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskProfile {
    High,
    Medium,
    Low,
    All,
}

/// One reusable step inside an [`AuditTemplate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateStep {
    pub title: String,
    pub objective: String,
    pub risk: String,
    pub procedures: Vec<String>,
}

/// A reusable blueprint used to seed an engagement's audit program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub risk_profile: RiskProfile,
    pub steps: Vec<TemplateStep>,
}

/// Lifecycle stage of an engagement, owned by the external engagement
/// collection. The engine only ever reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngagementStatus {
    Planned,
    Fieldwork,
    Review,
    Completed,
    Continuous,
}

impl EngagementStatus {
    /// Single lock predicate for the whole engine: a Completed or Review
    /// engagement is read-only and every mutating command is rejected.
    pub fn is_locked(&self) -> bool {
        matches!(self, EngagementStatus::Completed | EngagementStatus::Review)
    }
}

/// One audit project/assignment being executed (external, read-only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engagement {
    pub id: String,
    pub title: String,
    pub status: EngagementStatus,
    #[serde(default)]
    pub template_id: Option<String>,
    pub process_owner: String,
}

/// Workpaper completion state. Pass/fail are only reachable through the
/// conclusion operation in `engine::state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pending,
    Wip,
    Pass,
    Fail,
}

/// One individual test instruction inside a workpaper.
///
/// Ids are zero-padded strings assigned monotonically (`01`, `02`, ...);
/// they are never renumbered or reused after deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureRecord {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

/// Metadata descriptor for an uploaded evidence file. Byte transport is an
/// external storage concern; the engine only records what was attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceFile {
    pub name: String,
    pub size_display: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConclusionRating {
    Effective,
    Ineffective,
    NeedsImprovement,
}

/// The auditor's closing rating and summary for a workpaper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conclusion {
    pub rating: ConclusionRating,
    pub summary: String,
}

/// One unit of test documentation within an engagement's audit program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkpaperRecord {
    /// Sequential integer id, unique within one engagement's program.
    pub id: u32,
    pub title: String,
    pub status: TestStatus,
    /// Derived reference code, `WP-` + zero-padded id. Unique and
    /// ordering-stable within the program; findings link against it.
    pub reference: String,
    pub test_type: String,
    pub objective: String,
    pub risk: String,
    pub procedures: Vec<ProcedureRecord>,
    pub required_evidence: Vec<String>,
    pub uploaded_evidence: Vec<EvidenceFile>,
    #[serde(default)]
    pub findings_narrative: Option<String>,
    #[serde(default)]
    pub conclusion: Option<Conclusion>,
}

impl WorkpaperRecord {
    /// Derive the reference code for a workpaper id (`7` → `WP-07`).
    pub fn reference_for(id: u32) -> String {
        format!("WP-{:02}", id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingStatus {
    Open,
    PendingEvidence,
    Closed,
    Overdue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingType {
    Finding,
    Improvement,
}

/// An issue or improvement opportunity raised during fieldwork.
///
/// Produced by `engine::finding` and appended to the externally-owned
/// findings collection; follow-up mutation happens outside this engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub engagement_id: String,
    pub title: String,
    pub description: String,
    pub risk_rating: RiskRating,
    pub status: FindingStatus,
    #[serde(rename = "type")]
    pub kind: FindingType,
    pub identified_date: String,
    /// Reference code of the workpaper that surfaced this finding.
    pub linked_control: String,
    pub root_cause: String,
    pub impact: String,
    pub recommendation: String,
    #[serde(default)]
    pub management_response: String,
    #[serde(default)]
    pub action_plan: String,
}
