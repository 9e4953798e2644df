//! Merge engine: reconcile freshly parsed assignments into the store
//!
//! Logistics metadata (company, cargo, notes) is refreshed by later imports.
//! Arrival, departure deadline, plate and seal already recorded on a dock are
//! kept; a patch may only fill them in when they are absent.

use chrono::{DateTime, Utc};

use crate::model::{Assignment, AssignmentStore, PartialAssignmentSet, Source};

/// Tag given to a new entry whose patch carries no source of its own
pub const DEFAULT_IMPORT_SOURCE: Source = Source::Import;

/// Tag forced onto every entry merged over an existing assignment, even when
/// nothing changed
pub const MERGED_SOURCE_POLICY: Source = Source::Merged;

/// Merge `patch` into `current`, returning the new store.
///
/// Docks not present in `patch` are left untouched.
pub fn merge_into(
    current: &AssignmentStore,
    patch: &PartialAssignmentSet,
    now: DateTime<Utc>,
) -> AssignmentStore {
    let mut out = current.clone();

    for (&dock, incoming) in patch {
        let merged = match current.get(dock) {
            None => Assignment {
                source: Some(incoming.source.unwrap_or(DEFAULT_IMPORT_SOURCE)),
                last_updated: Some(now),
                ..incoming.clone()
            },
            Some(existing) => merge_fields(existing, incoming, now),
        };
        out.place(dock, merged);
    }

    out
}

fn merge_fields(existing: &Assignment, incoming: &Assignment, now: DateTime<Utc>) -> Assignment {
    Assignment {
        id: if incoming.id.is_empty() {
            existing.id.clone()
        } else {
            incoming.id.clone()
        },
        company: incoming.company.clone().or_else(|| existing.company.clone()),
        cargo_description: incoming
            .cargo_description
            .clone()
            .or_else(|| existing.cargo_description.clone()),
        notes: incoming.notes.clone().or_else(|| existing.notes.clone()),
        // protected: first recorded value wins
        plate: existing.plate.clone().or_else(|| incoming.plate.clone()),
        seal: existing.seal.clone().or_else(|| incoming.seal.clone()),
        arrival_time: existing.arrival_time.or(incoming.arrival_time),
        departure_deadline: existing.departure_deadline.or(incoming.departure_deadline),
        dock: existing.dock,
        source: Some(MERGED_SOURCE_POLICY),
        last_updated: Some(now),
    }
}
