//! Domain services
//!
//! Pure reconciliation logic: normalization, merge, status, swap, alerts.

pub mod alerts;
pub mod board;
pub mod merge;
pub mod normalize;
pub mod status;
pub mod swap;

pub use alerts::{departure_alerts, DepartureAlert};
pub use board::{board, BoardFilter, BoardRow, BoardSummary};
pub use merge::merge_into;
pub use status::{status_of, DockStatus};
pub use swap::{clear, release, swap};
