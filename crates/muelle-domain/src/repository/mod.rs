//! Repository trait definitions for data persistence

use crate::model::AssignmentStore;
use muelle_types::Error;

/// Persistence medium holding the whole store under one logical key
pub trait AssignmentRepository {
    /// Read the persisted snapshot.
    ///
    /// Absent or malformed content yields an empty store; this never fails.
    fn load(&self) -> AssignmentStore;

    /// Replace the persisted snapshot with `store`
    fn save(&self, store: &AssignmentStore) -> Result<(), Error>;
}
