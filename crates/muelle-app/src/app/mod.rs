//! Use cases over the dock board

pub mod board_service;
pub mod import_service;
pub mod watch_service;

pub use board_service::{DockSession, MergeReport};
pub use import_service::{import, parse_payload, ImportInput, ImportReport};
pub use watch_service::{watch, AlertTracker, WatchOptions, WatchTick};
