//! Dock board listing with company and alert filters

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::status::{status_of, DockStatus};
use crate::model::{Assignment, AssignmentStore, DockNumber};

/// Filters applied to the board listing
#[derive(Debug, Clone, Default)]
pub struct BoardFilter {
    /// Case-insensitive substring of the company name
    pub company: Option<String>,
    /// Keep only docks in warning or late state
    pub alerts_only: bool,
}

impl BoardFilter {
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn alerts_only(mut self, enabled: bool) -> Self {
        self.alerts_only = enabled;
        self
    }

    fn matches(&self, assignment: Option<&Assignment>, status: DockStatus) -> bool {
        if self.alerts_only && !status.needs_attention() {
            return false;
        }
        match self.company.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => assignment
                .and_then(|a| a.company.as_deref())
                .unwrap_or("")
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        }
    }
}

/// One dock on the board
#[derive(Debug, Clone, Serialize)]
pub struct BoardRow<'a> {
    pub dock: DockNumber,
    pub status: DockStatus,
    pub assignment: Option<&'a Assignment>,
}

/// Per-status counts over a set of rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoardSummary {
    pub free: usize,
    pub occupied: usize,
    pub warning: usize,
    pub late: usize,
}

impl BoardSummary {
    pub fn from_rows(rows: &[BoardRow<'_>]) -> Self {
        let mut summary = Self::default();
        for row in rows {
            match row.status {
                DockStatus::Free => summary.free += 1,
                DockStatus::Occupied => summary.occupied += 1,
                DockStatus::Warning => summary.warning += 1,
                DockStatus::Late => summary.late += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.free + self.occupied + self.warning + self.late
    }
}

/// Every managed dock that passes `filter`, classified at `now`
pub fn board<'a>(
    store: &'a AssignmentStore,
    filter: &BoardFilter,
    now: DateTime<Utc>,
) -> Vec<BoardRow<'a>> {
    store
        .docks()
        .map(|(dock, assignment)| BoardRow {
            dock,
            status: status_of(assignment, now),
            assignment,
        })
        .filter(|row| filter.matches(row.assignment, row.status))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::merge::merge_into;
    use chrono::Duration;

    fn sample(now: DateTime<Utc>) -> AssignmentStore {
        let dock = |n| DockNumber::new(n).unwrap();
        let patch = [
            Assignment::new(dock(320)).with_company("Acme Logistics"),
            Assignment::new(dock(321))
                .with_company("Beta")
                .with_departure_deadline(now + Duration::minutes(10)),
            Assignment::new(dock(322))
                .with_company("acme south")
                .with_departure_deadline(now - Duration::minutes(3)),
        ]
        .into_iter()
        .map(|a| (a.dock, a))
        .collect();
        merge_into(&AssignmentStore::new(), &patch, now)
    }

    #[test]
    fn test_unfiltered_board_is_total() {
        let now = Utc::now();
        let store = sample(now);
        let rows = board(&store, &BoardFilter::default(), now);
        assert_eq!(rows.len(), DockNumber::count());

        let summary = BoardSummary::from_rows(&rows);
        assert_eq!(summary.occupied, 1);
        assert_eq!(summary.warning, 1);
        assert_eq!(summary.late, 1);
        assert_eq!(summary.total(), DockNumber::count());
    }

    #[test]
    fn test_company_filter_case_insensitive() {
        let now = Utc::now();
        let store = sample(now);
        let rows = board(&store, &BoardFilter::default().with_company("ACME"), now);
        let docks: Vec<u16> = rows.iter().map(|r| r.dock.get()).collect();
        assert_eq!(docks, vec![320, 322]);
    }

    #[test]
    fn test_alerts_only() {
        let now = Utc::now();
        let store = sample(now);
        let rows = board(&store, &BoardFilter::default().alerts_only(true), now);
        let docks: Vec<u16> = rows.iter().map(|r| r.dock.get()).collect();
        assert_eq!(docks, vec![321, 322]);
    }
}
