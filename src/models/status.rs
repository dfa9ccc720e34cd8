use super::{event::AttendanceEvent, venue::Venue, worker::Worker};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Duty state derived from the latest event at read time. `StaleOnDuty`
/// is an advisory annotation (probable forgotten check-out); nothing in
/// storage ever holds this value.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum DutyState {
    OffDuty,
    OnDuty,
    StaleOnDuty,
}

impl DutyState {
    pub fn label(&self) -> &'static str {
        match self {
            DutyState::OffDuty => "OFF DUTY",
            DutyState::OnDuty => "ON DUTY",
            DutyState::StaleOnDuty => "ON DUTY (stale)",
        }
    }
}

/// One line of the live snapshot: a worker, their venue, and where the
/// alternating check-in/check-out sequence currently leaves them.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerStatus {
    pub worker: Worker,
    pub venue: Option<Venue>,
    pub state: DutyState,
    /// recorded_at of the latest event; None for workers with no events.
    pub since: Option<DateTime<Utc>>,
    pub last_origin: Option<(f64, f64)>,
}

/// Raw correlated row handed up by the storage port; the aggregator
/// turns it into a [`WorkerStatus`].
#[derive(Debug, Clone)]
pub struct StatusRow {
    pub worker: Worker,
    pub venue: Option<Venue>,
    pub latest: Option<AttendanceEvent>,
}
