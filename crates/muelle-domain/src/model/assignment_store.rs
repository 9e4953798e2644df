//! The authoritative dock -> assignment mapping

use std::collections::BTreeMap;

use super::assignment::Assignment;
use super::dock::DockNumber;

/// Sparse set of freshly parsed assignments, not yet merged
pub type PartialAssignmentSet = BTreeMap<DockNumber, Assignment>;

/// Total mapping from every managed dock to an assignment or "empty".
///
/// Only occupied docks are kept in the map; an absent key is an empty dock.
/// Every stored assignment has `dock` equal to its key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentStore {
    slots: BTreeMap<DockNumber, Assignment>,
}

impl AssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a persisted snapshot, where empty docks may be
    /// written out as `null`
    pub fn from_snapshot(snapshot: BTreeMap<DockNumber, Option<Assignment>>) -> Self {
        let mut store = Self::new();
        for (dock, assignment) in snapshot {
            if let Some(assignment) = assignment {
                store.place(dock, assignment);
            }
        }
        store
    }

    /// Occupied docks only, keyed by dock
    pub fn assignments(&self) -> &BTreeMap<DockNumber, Assignment> {
        &self.slots
    }

    pub fn get(&self, dock: DockNumber) -> Option<&Assignment> {
        self.slots.get(&dock)
    }

    pub fn is_free(&self, dock: DockNumber) -> bool {
        !self.slots.contains_key(&dock)
    }

    /// Every managed dock with its occupant, in ascending order
    pub fn docks(&self) -> impl Iterator<Item = (DockNumber, Option<&Assignment>)> + '_ {
        DockNumber::all().map(move |dock| (dock, self.slots.get(&dock)))
    }

    pub fn occupied(&self) -> impl Iterator<Item = (DockNumber, &Assignment)> + '_ {
        self.slots.iter().map(|(dock, a)| (*dock, a))
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn place(&mut self, dock: DockNumber, mut assignment: Assignment) {
        assignment.dock = dock;
        self.slots.insert(dock, assignment);
    }

    pub(crate) fn vacate(&mut self, dock: DockNumber) -> Option<Assignment> {
        self.slots.remove(&dock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dock(n: u16) -> DockNumber {
        DockNumber::new(n).unwrap()
    }

    #[test]
    fn test_from_snapshot_skips_nulls_and_fixes_dock() {
        let mut snapshot = BTreeMap::new();
        snapshot.insert(dock(320), Some(Assignment::new(dock(330))));
        snapshot.insert(dock(321), None);

        let store = AssignmentStore::from_snapshot(snapshot);
        assert_eq!(store.occupied_count(), 1);
        assert_eq!(store.get(dock(320)).unwrap().dock, dock(320));
        assert!(store.is_free(dock(321)));
    }

    #[test]
    fn test_docks_is_total() {
        let store = AssignmentStore::new();
        assert_eq!(store.docks().count(), DockNumber::count());
        assert!(store.docks().all(|(_, a)| a.is_none()));
    }
}
