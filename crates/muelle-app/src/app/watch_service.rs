//! Watch Service - periodic re-evaluation and one-time departure alerts

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};

use muelle_domain::service::{departure_alerts, DepartureAlert};
use muelle_domain::{AssignmentRepository, AssignmentStore, DockNumber};
use muelle_types::Result;

/// Remembers which `(dock, deadline)` pairs were already notified
#[derive(Debug, Default)]
pub struct AlertTracker {
    notified: HashSet<(DockNumber, DateTime<Utc>)>,
}

impl AlertTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alerts entering the band at `now` that have not fired before
    pub fn poll(&mut self, store: &AssignmentStore, now: DateTime<Utc>) -> Vec<DepartureAlert> {
        self.forget_stale(store);
        departure_alerts(store, now)
            .into_iter()
            .filter(|alert| self.notified.insert((alert.dock, alert.deadline)))
            .collect()
    }

    pub fn notified_count(&self) -> usize {
        self.notified.len()
    }

    // A dock that was released or given a new deadline may alert again.
    fn forget_stale(&mut self, store: &AssignmentStore) {
        self.notified.retain(|(dock, deadline)| {
            store
                .get(*dock)
                .and_then(|a| a.departure_deadline)
                .is_some_and(|current| current == *deadline)
        });
    }
}

#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub interval: Duration,
    /// Stop after this many polls; run forever when `None`
    pub ticks: Option<u64>,
}

impl WatchOptions {
    pub fn new(interval_secs: u64) -> Self {
        Self {
            interval: Duration::from_secs(interval_secs.max(1)),
            ticks: None,
        }
    }

    pub fn with_ticks(mut self, ticks: Option<u64>) -> Self {
        self.ticks = ticks;
        self
    }
}

/// State observed on one poll
#[derive(Debug)]
pub struct WatchTick {
    pub tick: u64,
    pub now: DateTime<Utc>,
    pub store: AssignmentStore,
    pub alerts: Vec<DepartureAlert>,
}

/// Poll the persisted board every interval and hand each tick to `on_tick`.
///
/// The snapshot is re-read on every poll so imports made from another
/// shell show up. Stops at the first error returned by `on_tick`.
pub fn watch<R, F>(repo: &R, options: &WatchOptions, mut on_tick: F) -> Result<()>
where
    R: AssignmentRepository,
    F: FnMut(&WatchTick) -> Result<()>,
{
    let mut tracker = AlertTracker::new();
    let mut tick = 0u64;

    loop {
        tick += 1;
        let store = repo.load();
        let now = Utc::now();
        let alerts = tracker.poll(&store, now);
        if !alerts.is_empty() {
            tracing::info!(tick, alerts = alerts.len(), "departure alerts fired");
        }

        on_tick(&WatchTick {
            tick,
            now,
            store,
            alerts,
        })?;

        if options.ticks.is_some_and(|limit| tick >= limit) {
            return Ok(());
        }
        std::thread::sleep(options.interval);
    }
}
