//! Domain model types

pub mod assignment;
pub mod assignment_store;
pub mod dock;

pub use assignment::{Assignment, Source};
pub use assignment_store::{AssignmentStore, PartialAssignmentSet};
pub use dock::{DockNumber, DOCK_MAX, DOCK_MIN};
