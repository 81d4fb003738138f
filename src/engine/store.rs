//! Workpaper Store: per-engagement cache of the authoritative program.
//!
//! Volatile by contract: state lives for the process lifetime only. Durable
//! persistence belongs to an external collaborator, which can use the
//! explicit `snapshot`/`restore` hooks to load and save the whole cache.
//!
//! Single-writer model: commands never interleave, so last-call-wins
//! replacement is sufficient and no locking exists here.

use rustc_hash::FxHashMap;

use crate::core::model::{AuditTemplate, Engagement, WorkpaperRecord};
use crate::engine::resolver;

/// Injectable cache of each engagement's workpaper program.
#[derive(Debug, Default)]
pub struct ProgramStore {
    programs: FxHashMap<String, Vec<WorkpaperRecord>>,
}

impl ProgramStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached program, resolving and caching it on first access.
    pub fn get_or_init(
        &mut self,
        engagement: &Engagement,
        templates: &[AuditTemplate],
    ) -> Vec<WorkpaperRecord> {
        self.programs
            .entry(engagement.id.clone())
            .or_insert_with(|| resolver::resolve(engagement, templates))
            .clone()
    }

    /// Overwrite the cache entry; called after every mutating operation.
    pub fn replace(&mut self, engagement_id: &str, program: Vec<WorkpaperRecord>) {
        self.programs.insert(engagement_id.to_string(), program);
    }

    /// Cached program without triggering resolution.
    pub fn get(&self, engagement_id: &str) -> Option<&Vec<WorkpaperRecord>> {
        self.programs.get(engagement_id)
    }

    /// Export the whole cache for an external persistence collaborator.
    pub fn snapshot(&self) -> Vec<(String, Vec<WorkpaperRecord>)> {
        let mut entries: Vec<_> = self
            .programs
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Replace the whole cache from a previously exported snapshot.
    pub fn restore(&mut self, entries: Vec<(String, Vec<WorkpaperRecord>)>) {
        self.programs = entries.into_iter().collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{EngagementStatus, TestStatus};
    use crate::core::seed;

    fn engagement(id: &str, template_id: Option<&str>) -> Engagement {
        Engagement {
            id: id.to_string(),
            title: "Engagement".to_string(),
            status: EngagementStatus::Fieldwork,
            template_id: template_id.map(str::to_string),
            process_owner: "Owner".to_string(),
        }
    }

    #[test]
    fn test_get_or_init_resolves_once() {
        let templates = seed::demo_templates();
        let mut store = ProgramStore::new();
        let eng = engagement("A-01", Some("T-01"));

        let first = store.get_or_init(&eng, &templates);
        assert_eq!(first.len(), 3);

        // A second call must hit the cache, not rebuild from the template.
        let mut mutated = first.clone();
        mutated[0].status = TestStatus::Wip;
        store.replace(&eng.id, mutated);
        let second = store.get_or_init(&eng, &templates);
        assert_eq!(second[0].status, TestStatus::Wip);
    }

    #[test]
    fn test_replace_overwrites_entry() {
        let templates = seed::demo_templates();
        let mut store = ProgramStore::new();
        let eng = engagement("B-01", None);
        let program = store.get_or_init(&eng, &templates);
        store.replace(&eng.id, Vec::new());
        assert!(store.get(&eng.id).unwrap().is_empty());
        assert_ne!(program.len(), 0);
    }

    #[test]
    fn test_snapshot_restore_round_trips() {
        let templates = seed::demo_templates();
        let mut store = ProgramStore::new();
        store.get_or_init(&engagement("A-01", Some("T-01")), &templates);
        store.get_or_init(&engagement("B-01", None), &templates);

        let snapshot = store.snapshot();
        let mut restored = ProgramStore::new();
        restored.restore(snapshot.clone());
        assert_eq!(restored.snapshot(), snapshot);
    }

    #[test]
    fn test_programs_are_isolated_per_engagement() {
        let templates = seed::demo_templates();
        let mut store = ProgramStore::new();
        let a = store.get_or_init(&engagement("A-01", Some("T-01")), &templates);
        let b = store.get_or_init(&engagement("B-01", None), &templates);
        assert_ne!(a.len(), b.len());
    }
}
