//! Manual repositioning of trucks between docks

use crate::model::{AssignmentStore, DockNumber};

/// Exchange the occupants of `a` and `b`; either may be empty.
///
/// Moved assignments get their `dock` rewritten and nothing else, so
/// swapping the same pair twice restores the original store.
pub fn swap(store: &AssignmentStore, a: DockNumber, b: DockNumber) -> AssignmentStore {
    let mut out = store.clone();
    if a == b {
        return out;
    }

    let from_a = out.vacate(a);
    let from_b = out.vacate(b);
    if let Some(assignment) = from_a {
        out.place(b, assignment);
    }
    if let Some(assignment) = from_b {
        out.place(a, assignment);
    }

    tracing::debug!(%a, %b, "swapped dock occupants");
    out
}

/// Empty a single dock
pub fn release(store: &AssignmentStore, dock: DockNumber) -> AssignmentStore {
    let mut out = store.clone();
    out.vacate(dock);
    out
}

/// Empty every dock
pub fn clear() -> AssignmentStore {
    tracing::debug!("cleared all docks");
    AssignmentStore::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Assignment;
    use crate::service::merge::merge_into;
    use chrono::Utc;

    fn dock(n: u16) -> DockNumber {
        DockNumber::new(n).unwrap()
    }

    fn sample_store() -> AssignmentStore {
        let patch = [
            Assignment::new(dock(320)).with_company("Acme"),
            Assignment::new(dock(321)).with_company("Beta"),
        ]
        .into_iter()
        .map(|a| (a.dock, a))
        .collect();
        merge_into(&AssignmentStore::new(), &patch, Utc::now())
    }

    #[test]
    fn test_swap_two_occupied() {
        let store = swap(&sample_store(), dock(320), dock(321));
        let a = store.get(dock(320)).unwrap();
        assert_eq!(a.company.as_deref(), Some("Beta"));
        assert_eq!(a.dock, dock(320));
        assert_eq!(store.get(dock(321)).unwrap().company.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_swap_into_empty() {
        let store = swap(&sample_store(), dock(320), dock(370));
        assert!(store.is_free(dock(320)));
        assert_eq!(store.get(dock(370)).unwrap().dock, dock(370));
    }

    #[test]
    fn test_swap_is_involution() {
        let original = sample_store();
        for (a, b) in [(320, 321), (320, 340), (312, 370)] {
            let once = swap(&original, dock(a), dock(b));
            let twice = swap(&once, dock(a), dock(b));
            assert_eq!(twice, original);
        }
    }

    #[test]
    fn test_swap_same_dock_is_noop() {
        let original = sample_store();
        assert_eq!(swap(&original, dock(320), dock(320)), original);
    }

    #[test]
    fn test_release() {
        let store = release(&sample_store(), dock(320));
        assert!(store.is_free(dock(320)));
        assert_eq!(store.occupied_count(), 1);
    }

    #[test]
    fn test_clear() {
        assert_eq!(sample_store().occupied_count(), 2);
        assert_eq!(clear().occupied_count(), 0);
    }
}
