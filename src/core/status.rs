//! Fleet-wide live duty snapshot.
//!
//! Read-only over the storage port; polling it never touches stored
//! state. Current state is always derived from the latest event rather
//! than a denormalized status column, so there is exactly one source of
//! truth for "who is on duty".

use crate::config::Config;
use crate::errors::AppResult;
use crate::models::status::{DutyState, WorkerStatus};
use crate::store::StoragePort;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

pub struct LiveStatusAggregator {
    port: Arc<dyn StoragePort>,
    stale_after: Duration,
}

impl LiveStatusAggregator {
    pub fn new(port: Arc<dyn StoragePort>, cfg: &Config) -> Self {
        Self::with_stale_after(port, cfg.stale_after_hours)
    }

    pub fn with_stale_after(port: Arc<dyn StoragePort>, hours: i64) -> Self {
        Self {
            port,
            stale_after: Duration::hours(hours),
        }
    }

    /// One status line per active worker, correlated with its venue and
    /// latest event.
    pub fn snapshot(&self) -> AppResult<Vec<WorkerStatus>> {
        self.snapshot_at(Utc::now())
    }

    /// Same as [`snapshot`](Self::snapshot) with an explicit clock, so
    /// staleness can be tested deterministically.
    pub fn snapshot_at(&self, now: DateTime<Utc>) -> AppResult<Vec<WorkerStatus>> {
        let rows = self.port.status_rows()?;

        let statuses = rows
            .into_iter()
            .map(|row| {
                let (state, since, last_origin) = match &row.latest {
                    None => (DutyState::OffDuty, None, None),
                    Some(ev) if ev.kind.is_check_in() => {
                        // Advisory only: a shift still open well past a
                        // normal length is probably a forgotten check-out.
                        let state = if now - ev.recorded_at > self.stale_after {
                            DutyState::StaleOnDuty
                        } else {
                            DutyState::OnDuty
                        };
                        (state, Some(ev.recorded_at), ev.origin())
                    }
                    Some(ev) => (DutyState::OffDuty, Some(ev.recorded_at), ev.origin()),
                };

                WorkerStatus {
                    worker: row.worker,
                    venue: row.venue,
                    state,
                    since,
                    last_origin,
                }
            })
            .collect();

        Ok(statuses)
    }
}
