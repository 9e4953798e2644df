//! Time-based dock status classification

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Assignment;

/// Minutes before the deadline at which an occupied dock turns to warning
pub const WARNING_WINDOW_MINUTES: f64 = 30.0;

/// Operational urgency of a dock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DockStatus {
    /// No truck assigned
    Free,
    /// Truck present, deadline absent or more than 30 minutes away
    Occupied,
    /// Deadline within the next 30 minutes
    Warning,
    /// Deadline already passed
    Late,
}

impl DockStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DockStatus::Free => "libre",
            DockStatus::Occupied => "ocupado",
            DockStatus::Warning => "alerta-30",
            DockStatus::Late => "retraso",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            DockStatus::Free => "✅",
            DockStatus::Occupied => "📦",
            DockStatus::Warning => "🕒",
            DockStatus::Late => "⛔",
        }
    }

    /// Presentation tag for badge styling
    pub fn css_class(&self) -> &'static str {
        match self {
            DockStatus::Late => "badge bg-red-100 text-red-700",
            DockStatus::Warning => "badge bg-yellow-100 text-yellow-800",
            DockStatus::Occupied => "badge bg-blue-100 text-blue-700",
            DockStatus::Free => "badge bg-green-100 text-green-700",
        }
    }

    /// Warning or late
    pub fn needs_attention(&self) -> bool {
        matches!(self, DockStatus::Warning | DockStatus::Late)
    }
}

/// Fractional minutes until the departure deadline, if one is set
pub fn minutes_remaining(assignment: &Assignment, now: DateTime<Utc>) -> Option<f64> {
    assignment
        .departure_deadline
        .map(|deadline| (deadline - now).num_milliseconds() as f64 / 60_000.0)
}

/// Classify a dock from its occupant (or absence) at `now`
pub fn status_of(assignment: Option<&Assignment>, now: DateTime<Utc>) -> DockStatus {
    let Some(assignment) = assignment else {
        return DockStatus::Free;
    };

    match minutes_remaining(assignment, now) {
        None => DockStatus::Occupied,
        Some(m) if m < 0.0 => DockStatus::Late,
        Some(m) if m <= WARNING_WINDOW_MINUTES => DockStatus::Warning,
        Some(_) => DockStatus::Occupied,
    }
}
