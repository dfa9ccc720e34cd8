//! The attendance engine: strict alternating check-in/check-out per
//! worker, geofenced check-ins, transient-failure retries.
//!
//! Per-worker state machine: OFF_DUTY --check-in (geofence ok)--> ON_DUTY,
//! ON_DUTY --check-out--> OFF_DUTY. A worker with no events is OFF_DUTY,
//! so the first event must always be a check-in. Any other requested
//! transition is rejected with a sequence violation.

use crate::config::Config;
use crate::core::{geo, retry, retry::RetryPolicy};
use crate::errors::{AppError, AppResult};
use crate::models::event::{AttendanceEvent, CreateRequest, EventFilter};
use crate::models::event_type::EventType;
use crate::store::{NewEvent, StoragePort, TxnView};
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub struct AttendanceStore {
    port: Arc<dyn StoragePort>,
    geofence_radius_m: f64,
    max_fix_age_secs: i64,
    retry: RetryPolicy,
}

impl AttendanceStore {
    pub fn new(port: Arc<dyn StoragePort>, cfg: &Config) -> Self {
        Self {
            port,
            geofence_radius_m: cfg.geofence_radius_m,
            max_fix_age_secs: cfg.max_fix_age_secs,
            retry: cfg.retry_policy(),
        }
    }

    /// Record one attendance event. The whole read-validate-append runs
    /// inside the adapter's transaction; every error branch rolls back
    /// before returning, which is what makes the retry wrapper safe —
    /// a re-run starts from scratch against committed state only.
    pub fn create(&self, req: &CreateRequest) -> AppResult<AttendanceEvent> {
        retry::run(&self.retry, || {
            self.port
                .create_atomic(req.worker_id, &|view| self.decide(req, view, Utc::now()))
        })
    }

    pub fn get_latest(&self, worker_id: i64) -> AppResult<Option<AttendanceEvent>> {
        self.port.get_latest(worker_id)
    }

    pub fn list(&self, filter: &EventFilter) -> AppResult<Vec<AttendanceEvent>> {
        self.port.list(filter)
    }

    /// Pure eligibility check against the transactional view. Called by
    /// the adapter between its read and its append.
    fn decide(&self, req: &CreateRequest, view: &TxnView, now: DateTime<Utc>) -> AppResult<NewEvent> {
        let worker = view
            .worker
            .as_ref()
            .ok_or(AppError::WorkerNotFound(req.worker_id))?;

        // No prior event counts as a check-out, so check-in goes first.
        let expected = view
            .latest
            .as_ref()
            .map(|e| e.kind.opposite())
            .unwrap_or(EventType::CheckIn);
        if req.kind != expected {
            return Err(AppError::SequenceViolation { expected });
        }

        let origin = match req.kind {
            EventType::CheckOut => None,
            EventType::CheckIn => {
                if worker.venue_id.is_none() {
                    return Err(AppError::VenueNotAssigned(worker.id));
                }
                // Assigned id without a venue row means the directory
                // mirror is out of sync; same remedy as no assignment.
                let venue = view
                    .venue
                    .as_ref()
                    .ok_or(AppError::VenueNotAssigned(worker.id))?;

                let fix = req.origin.ok_or(AppError::LocationRequired)?;
                if let Some(captured_at) = fix.captured_at {
                    let age_secs = (now - captured_at).num_seconds();
                    if age_secs > self.max_fix_age_secs {
                        return Err(AppError::StaleLocation {
                            age_secs,
                            max_secs: self.max_fix_age_secs,
                        });
                    }
                }

                geo::validate(
                    Some((fix.latitude, fix.longitude)),
                    venue,
                    self.geofence_radius_m,
                )?;
                Some((fix.latitude, fix.longitude))
            }
        };

        Ok(NewEvent {
            worker_id: worker.id,
            kind: req.kind,
            comment: req.comment.clone(),
            origin,
        })
    }
}
