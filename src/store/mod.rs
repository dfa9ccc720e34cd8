//! Storage port: the narrow interface the attendance engine talks to.
//!
//! Adapters own atomicity. `create_atomic` must read the transactional
//! view, apply the caller's decision function, and append the returned
//! row as one unit per worker: either the new event is committed with a
//! server-assigned timestamp, or nothing is persisted at all. Adapters
//! also own retry classification — a retryable driver failure comes back
//! as [`AppError::TransientStore`], anything else as a permanent error.

pub mod memory;
pub mod sqlite;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::event::{AttendanceEvent, EventFilter};
use crate::models::event_type::EventType;
use crate::models::status::StatusRow;
use crate::models::venue::Venue;
use crate::models::worker::Worker;
use std::sync::Arc;

/// Everything `create` needs to see, read atomically for one worker:
/// the worker row, its assigned venue (joined), and the single most
/// recent attendance event.
#[derive(Debug, Clone)]
pub struct TxnView {
    pub worker: Option<Worker>,
    pub venue: Option<Venue>,
    pub latest: Option<AttendanceEvent>,
}

/// Row to append. `id` and `recorded_at` are assigned by the adapter
/// inside the same transaction that read the [`TxnView`].
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub worker_id: i64,
    pub kind: EventType,
    pub comment: Option<String>,
    pub origin: Option<(f64, f64)>,
}

/// Pure decision function: no I/O, may be re-run on every retry round.
pub type Decide<'a> = &'a dyn Fn(&TxnView) -> AppResult<NewEvent>;

pub trait StoragePort: Send + Sync {
    /// One atomic create attempt for `worker_id`. Two concurrent calls
    /// for the same worker must serialize so at most one of them sees
    /// eligibility for a given transition.
    fn create_atomic(&self, worker_id: i64, decide: Decide) -> AppResult<AttendanceEvent>;

    /// Most recent event for a worker, or None if they never clocked in.
    fn get_latest(&self, worker_id: i64) -> AppResult<Option<AttendanceEvent>>;

    /// Events matching `filter`, recorded_at descending, bounded by limit.
    fn list(&self, filter: &EventFilter) -> AppResult<Vec<AttendanceEvent>>;

    /// One correlated row per active worker (venue + latest event),
    /// without scanning the full event log.
    fn status_rows(&self) -> AppResult<Vec<StatusRow>>;
}

/// Pick the storage adapter at process start. Business logic never
/// knows which backing engine it got.
pub fn open_from_config(cfg: &Config) -> AppResult<Arc<dyn StoragePort>> {
    match cfg.storage.as_str() {
        "sqlite" => Ok(Arc::new(sqlite::SqliteStore::open(&cfg.database)?)),
        "memory" => Ok(Arc::new(memory::MemoryStore::new())),
        other => Err(AppError::Config(format!(
            "Unknown storage backend '{}' (expected 'sqlite' or 'memory')",
            other
        ))),
    }
}
