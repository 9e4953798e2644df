//! Board Service - the dock board held for one session
//!
//! The store is loaded once when the session opens. Every mutation computes
//! the next store, persists it, and only then replaces the in-memory copy.

use chrono::{DateTime, Utc};
use serde::Serialize;

use muelle_domain::service::{self, merge_into};
use muelle_domain::{
    Assignment, AssignmentRepository, AssignmentStore, DockNumber, PartialAssignmentSet, Source,
};
use muelle_types::Result;

/// Outcome of merging one patch into the board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Entries in the patch
    pub recognized: usize,
    /// Entries placed on previously free docks
    pub inserted: usize,
    /// Entries merged over an existing assignment
    pub merged: usize,
}

pub struct DockSession<R: AssignmentRepository> {
    repo: R,
    store: AssignmentStore,
}

impl<R: AssignmentRepository> DockSession<R> {
    pub fn open(repo: R) -> Self {
        let store = repo.load();
        tracing::debug!(occupied = store.occupied_count(), "session opened");
        Self { repo, store }
    }

    pub fn store(&self) -> &AssignmentStore {
        &self.store
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    fn commit(&mut self, next: AssignmentStore) -> Result<()> {
        self.repo.save(&next)?;
        self.store = next;
        Ok(())
    }

    /// Reconcile a parsed patch into the board
    pub fn apply_patch(
        &mut self,
        patch: &PartialAssignmentSet,
        now: DateTime<Utc>,
    ) -> Result<MergeReport> {
        let mut report = MergeReport {
            recognized: patch.len(),
            ..MergeReport::default()
        };
        if patch.is_empty() {
            return Ok(report);
        }

        for dock in patch.keys() {
            if self.store.is_free(*dock) {
                report.inserted += 1;
            } else {
                report.merged += 1;
            }
        }

        let next = merge_into(&self.store, patch, now);
        self.commit(next)?;
        tracing::info!(
            recognized = report.recognized,
            inserted = report.inserted,
            merged = report.merged,
            "patch applied"
        );
        Ok(report)
    }

    /// Record an operator entry through the merge engine
    pub fn assign(&mut self, assignment: Assignment, now: DateTime<Utc>) -> Result<MergeReport> {
        let assignment = assignment.with_source(Source::Manual);
        let patch = std::iter::once((assignment.dock, assignment)).collect();
        self.apply_patch(&patch, now)
    }

    pub fn swap(&mut self, a: DockNumber, b: DockNumber) -> Result<()> {
        let next = service::swap(&self.store, a, b);
        self.commit(next)?;
        tracing::info!(%a, %b, "docks swapped");
        Ok(())
    }

    /// Empty `dock`, returning the assignment that was there
    pub fn release(&mut self, dock: DockNumber) -> Result<Option<Assignment>> {
        let previous = self.store.get(dock).cloned();
        if previous.is_none() {
            return Ok(None);
        }
        let next = service::release(&self.store, dock);
        self.commit(next)?;
        tracing::info!(%dock, "dock released");
        Ok(previous)
    }

    /// Empty every dock, returning how many were occupied
    pub fn clear(&mut self) -> Result<usize> {
        let cleared = self.store.occupied_count();
        self.commit(service::clear())?;
        tracing::info!(cleared, "all docks cleared");
        Ok(cleared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muelle_store::SnapshotStore;
    use tempfile::tempdir;

    fn dock(n: u16) -> DockNumber {
        DockNumber::new(n).unwrap()
    }

    fn session_in(dir: &std::path::Path) -> DockSession<SnapshotStore> {
        DockSession::open(SnapshotStore::open(dir.to_path_buf()).unwrap())
    }

    #[test]
    fn test_mutations_are_written_through() {
        let dir = tempdir().unwrap();
        let now = Utc::now();

        let mut session = session_in(dir.path());
        session
            .assign(Assignment::new(dock(320)).with_company("Acme"), now)
            .unwrap();
        session.swap(dock(320), dock(330)).unwrap();

        let reopened = session_in(dir.path());
        let a = reopened.store().get(dock(330)).unwrap();
        assert_eq!(a.company.as_deref(), Some("Acme"));
        assert_eq!(a.source, Some(Source::Manual));
        assert!(reopened.store().is_free(dock(320)));
    }

    #[test]
    fn test_apply_patch_reports_inserted_and_merged() {
        let dir = tempdir().unwrap();
        let now = Utc::now();
        let mut session = session_in(dir.path());

        let first: PartialAssignmentSet = [Assignment::new(dock(320)), Assignment::new(dock(321))]
            .into_iter()
            .map(|a| (a.dock, a))
            .collect();
        let report = session.apply_patch(&first, now).unwrap();
        assert_eq!((report.recognized, report.inserted, report.merged), (2, 2, 0));

        let second: PartialAssignmentSet = [Assignment::new(dock(321)), Assignment::new(dock(322))]
            .into_iter()
            .map(|a| (a.dock, a))
            .collect();
        let report = session.apply_patch(&second, now).unwrap();
        assert_eq!((report.recognized, report.inserted, report.merged), (2, 1, 1));
        assert_eq!(
            session.store().get(dock(321)).unwrap().source,
            Some(Source::Merged)
        );
    }

    #[test]
    fn test_empty_patch_does_not_write() {
        let dir = tempdir().unwrap();
        let mut session = session_in(dir.path());
        let report = session
            .apply_patch(&PartialAssignmentSet::new(), Utc::now())
            .unwrap();
        assert_eq!(report, MergeReport::default());
        assert!(!session.repository().path().exists());
    }

    #[test]
    fn test_release_and_clear() {
        let dir = tempdir().unwrap();
        let now = Utc::now();
        let mut session = session_in(dir.path());
        session.assign(Assignment::new(dock(340)), now).unwrap();
        session.assign(Assignment::new(dock(341)), now).unwrap();

        assert!(session.release(dock(340)).unwrap().is_some());
        assert!(session.release(dock(340)).unwrap().is_none());
        assert_eq!(session.clear().unwrap(), 1);
        assert_eq!(session_in(dir.path()).store().occupied_count(), 0);
    }
}
