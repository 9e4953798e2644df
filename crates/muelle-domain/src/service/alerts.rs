//! Departure alert detection
//!
//! Alerts are edge-triggered: a dock qualifies only while its remaining time
//! sits in the narrow `(29, 30]` minute band, so a once-per-minute poll sees
//! it on a single tick rather than for the whole warning state.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::status::minutes_remaining;
use crate::model::{AssignmentStore, DockNumber};

/// Upper edge of the alert band (inclusive), in minutes
pub const ALERT_BAND_UPPER: f64 = 30.0;
/// Lower edge of the alert band (exclusive), in minutes
pub const ALERT_BAND_LOWER: f64 = 29.0;

/// A "departure in 30 minutes" notification for one dock
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartureAlert {
    pub dock: DockNumber,
    pub deadline: DateTime<Utc>,
    pub minutes_remaining: f64,
    pub company: Option<String>,
    pub cargo_description: Option<String>,
}

impl DepartureAlert {
    pub fn title(&self) -> String {
        format!("Muelle {}: salida en 30 min", self.dock)
    }

    pub fn body(&self) -> String {
        format!(
            "{} · {}",
            self.company.as_deref().unwrap_or(""),
            self.cargo_description.as_deref().unwrap_or("")
        )
    }
}

pub fn in_alert_band(minutes: f64) -> bool {
    minutes > ALERT_BAND_LOWER && minutes <= ALERT_BAND_UPPER
}

/// Docks whose departure deadline is entering the 30 minute band at `now`
pub fn departure_alerts(store: &AssignmentStore, now: DateTime<Utc>) -> Vec<DepartureAlert> {
    store
        .occupied()
        .filter_map(|(dock, assignment)| {
            let deadline = assignment.departure_deadline?;
            let minutes = minutes_remaining(assignment, now)?;
            in_alert_band(minutes).then(|| DepartureAlert {
                dock,
                deadline,
                minutes_remaining: minutes,
                company: assignment.company.clone(),
                cargo_description: assignment.cargo_description.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Assignment;
    use crate::service::merge::merge_into;
    use chrono::Duration;

    fn store_with_deadlines(now: DateTime<Utc>, offsets_secs: &[(u16, i64)]) -> AssignmentStore {
        let patch = offsets_secs
            .iter()
            .map(|&(n, secs)| {
                let dock = DockNumber::new(n).unwrap();
                let a = Assignment::new(dock)
                    .with_company("Acme")
                    .with_departure_deadline(now + Duration::seconds(secs));
                (dock, a)
            })
            .collect();
        merge_into(&AssignmentStore::new(), &patch, now)
    }

    #[test]
    fn test_band_edges() {
        assert!(in_alert_band(30.0));
        assert!(in_alert_band(29.5));
        assert!(!in_alert_band(29.0));
        assert!(!in_alert_band(30.01));
    }

    #[test]
    fn test_only_band_docks_alert() {
        let now = Utc::now();
        let store = store_with_deadlines(
            now,
            &[(320, 30 * 60), (321, 29 * 60 + 30), (322, 10 * 60), (323, 45 * 60)],
        );

        let alerts = departure_alerts(&store, now);
        let docks: Vec<u16> = alerts.iter().map(|a| a.dock.get()).collect();
        assert_eq!(docks, vec![320, 321]);
        assert_eq!(alerts[0].title(), "Muelle 320: salida en 30 min");
        assert_eq!(alerts[0].body(), "Acme · ");
    }
}
