use super::event_type::EventType;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One immutable attendance event. Rows are append-only: no update or
/// delete path exists anywhere in the crate.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceEvent {
    pub id: i64,
    pub worker_id: i64,             // ⇔ events.worker_id
    pub kind: EventType,            // ⇔ events.kind ('in' | 'out')
    pub comment: Option<String>,    // ⇔ events.comment
    /// Server-assigned inside the insert transaction. Never taken from
    /// the caller, so nobody can back-date a check-in.
    pub recorded_at: DateTime<Utc>, // ⇔ events.recorded_at (RFC 3339)
    pub origin_lat: Option<f64>,    // ⇔ events.origin_lat (check-in only)
    pub origin_lon: Option<f64>,    // ⇔ events.origin_lon (check-in only)
}

impl AttendanceEvent {
    pub fn recorded_at_str(&self) -> String {
        self.recorded_at.format("%Y-%m-%d %H:%M").to_string()
    }

    pub fn origin(&self) -> Option<(f64, f64)> {
        match (self.origin_lat, self.origin_lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// A worker-supplied GPS fix accompanying a check-in request.
#[derive(Debug, Clone, Copy)]
pub struct OriginFix {
    pub latitude: f64,
    pub longitude: f64,
    /// When the device captured the fix. `None` means "just now"
    /// (trusted caller, e.g. the CLI capturing interactively).
    pub captured_at: Option<DateTime<Utc>>,
}

/// Input to `AttendanceStore::create`. Everything the caller is allowed
/// to choose; id and recorded_at are assigned by the store.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub worker_id: i64,
    pub kind: EventType,
    pub comment: Option<String>,
    pub origin: Option<OriginFix>,
}

/// Filter for `AttendanceStore::list`. Results are always ordered by
/// recorded_at descending and bounded by `limit`.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub worker_id: Option<i64>,
    pub kind: Option<EventType>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}
