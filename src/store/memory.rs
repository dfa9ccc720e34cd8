//! In-memory adapter: the dev/test stand-in for SQLite.
//!
//! Atomicity comes from a per-worker lock map instead of transactions.
//! The outer map mutex is only held long enough to fetch or create the
//! worker's lock; the per-worker lock is held for exactly one create
//! call and never across anything else. Creates for different workers
//! proceed in parallel.

use crate::errors::{AppError, AppResult};
use crate::models::event::{AttendanceEvent, EventFilter};
use crate::models::status::StatusRow;
use crate::models::venue::Venue;
use crate::models::worker::Worker;
use crate::store::{Decide, StoragePort, TxnView};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

#[derive(Default)]
struct Directory {
    workers: HashMap<i64, Worker>,
    venues: HashMap<i64, Venue>,
}

#[derive(Default)]
pub struct MemoryStore {
    directory: RwLock<Directory>,
    events: RwLock<Vec<AttendanceEvent>>,
    next_id: AtomicI64,
    worker_locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            ..Self::default()
        }
    }

    /// Seed or refresh one worker of the directory mirror.
    pub fn seed_worker(&self, worker: Worker) {
        let mut dir = self.directory.write().unwrap_or_else(|e| e.into_inner());
        dir.workers.insert(worker.id, worker);
    }

    /// Seed or refresh one venue of the directory mirror.
    pub fn seed_venue(&self, venue: Venue) {
        let mut dir = self.directory.write().unwrap_or_else(|e| e.into_inner());
        dir.venues.insert(venue.id, venue);
    }

    fn worker_lock(&self, worker_id: i64) -> AppResult<Arc<Mutex<()>>> {
        let mut locks = self
            .worker_locks
            .lock()
            .map_err(|_| AppError::Other("worker lock map poisoned".to_string()))?;
        Ok(locks.entry(worker_id).or_default().clone())
    }

    fn read_view(&self, worker_id: i64) -> AppResult<TxnView> {
        let dir = self.directory.read().unwrap_or_else(|e| e.into_inner());
        let worker = dir.workers.get(&worker_id).cloned();
        let venue = worker
            .as_ref()
            .and_then(|w| w.venue_id)
            .and_then(|vid| dir.venues.get(&vid).cloned());
        drop(dir);

        let latest = self.latest_for(worker_id)?;
        Ok(TxnView {
            worker,
            venue,
            latest,
        })
    }

    fn latest_for(&self, worker_id: i64) -> AppResult<Option<AttendanceEvent>> {
        let events = self.events.read().unwrap_or_else(|e| e.into_inner());
        // Appends happen in time order per worker, so the last match
        // is the most recent event.
        Ok(events
            .iter()
            .rev()
            .find(|e| e.worker_id == worker_id)
            .cloned())
    }
}

impl StoragePort for MemoryStore {
    fn create_atomic(&self, worker_id: i64, decide: Decide) -> AppResult<AttendanceEvent> {
        let lock = self.worker_lock(worker_id)?;
        let _guard = lock
            .lock()
            .map_err(|_| AppError::Other("worker lock poisoned".to_string()))?;

        let view = self.read_view(worker_id)?;
        let new = decide(&view)?;

        let event = AttendanceEvent {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            worker_id: new.worker_id,
            kind: new.kind,
            comment: new.comment,
            recorded_at: Utc::now(),
            origin_lat: new.origin.map(|(lat, _)| lat),
            origin_lon: new.origin.map(|(_, lon)| lon),
        };

        let mut events = self.events.write().unwrap_or_else(|e| e.into_inner());
        events.push(event.clone());
        Ok(event)
    }

    fn get_latest(&self, worker_id: i64) -> AppResult<Option<AttendanceEvent>> {
        self.latest_for(worker_id)
    }

    fn list(&self, filter: &EventFilter) -> AppResult<Vec<AttendanceEvent>> {
        let events = self.events.read().unwrap_or_else(|e| e.into_inner());

        let mut out: Vec<AttendanceEvent> = events
            .iter()
            .filter(|e| filter.worker_id.is_none_or(|id| e.worker_id == id))
            .filter(|e| filter.kind.is_none_or(|k| e.kind == k))
            .filter(|e| filter.from.is_none_or(|from| e.recorded_at >= from))
            .filter(|e| filter.to.is_none_or(|to| e.recorded_at <= to))
            .cloned()
            .collect();

        out.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at).then(b.id.cmp(&a.id)));
        out.truncate(filter.limit.unwrap_or(100));
        Ok(out)
    }

    fn status_rows(&self) -> AppResult<Vec<StatusRow>> {
        let dir = self.directory.read().unwrap_or_else(|e| e.into_inner());

        let mut workers: Vec<Worker> = dir.workers.values().filter(|w| w.active).cloned().collect();
        workers.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        let mut out = Vec::with_capacity(workers.len());
        for worker in workers {
            let venue = worker
                .venue_id
                .and_then(|vid| dir.venues.get(&vid).cloned());
            let latest = self.latest_for(worker.id)?;
            out.push(StatusRow {
                worker,
                venue,
                latest,
            });
        }
        Ok(out)
    }
}
