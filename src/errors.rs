//! Unified application error type.
//! All modules (db, core, store, cli) return AppError to keep the error
//! handling consistent and easy to manage.

use crate::models::event_type::EventType;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    /// Retryable storage failure, classified by the adapter itself
    /// (SQLITE_BUSY, SQLITE_LOCKED). Never surfaced to callers directly:
    /// the retry executor either absorbs it or converts it to
    /// [`AppError::StoreUnavailable`] once attempts are exhausted.
    #[error("Transient storage error: {0}")]
    TransientStore(String),

    #[error("Storage unavailable after {attempts} attempts: {reason}")]
    StoreUnavailable { attempts: u32, reason: String },

    // ---------------------------
    // Attendance validation
    // ---------------------------
    #[error("Worker {0} not found")]
    WorkerNotFound(i64),

    #[error("Worker {0} has no assigned venue")]
    VenueNotAssigned(i64),

    #[error("Venue '{0}' has no coordinates configured")]
    VenueNotGeolocated(String),

    #[error("Check-in requires the worker's current coordinates")]
    LocationRequired,

    #[error("Position fix is {age_secs}s old (maximum {max_secs}s)")]
    StaleLocation { age_secs: i64, max_secs: i64 },

    #[error("Out of range: {distance_m} m from the venue (maximum {max_m} m)")]
    OutOfRange { distance_m: i64, max_m: i64 },

    #[error("Sequence violation: next event for this worker must be '{}'", expected.as_db_str())]
    SequenceViolation { expected: EventType },

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid event kind: {0}")]
    InvalidEventKind(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid directory file: {0}")]
    InvalidDirectory(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// Closed retry category: only errors the storage adapter marked as
    /// transient are worth re-running. Everything else fails fast.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::TransientStore(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;
