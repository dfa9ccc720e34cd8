//! SQLite adapter for the storage port.
//!
//! `create_atomic` runs as one IMMEDIATE transaction: the write lock is
//! taken up front, so the view read and the insert cannot interleave
//! with another create for the same (or any) worker. Dropping the
//! transaction on an error path is the rollback — nothing persists
//! until the final commit.

use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::queries::{map_event_row, map_worker_row};
use crate::errors::{AppError, AppResult};
use crate::models::event::{AttendanceEvent, EventFilter};
use crate::models::status::StatusRow;
use crate::models::venue::Venue;
use crate::models::worker::Worker;
use crate::store::{Decide, NewEvent, StoragePort, TxnView};
use crate::utils::time::format_ts;
use chrono::{Timelike, Utc};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Transaction, params};
use std::sync::Mutex;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database and bring the schema up to date.
    pub fn open(path: &str) -> AppResult<Self> {
        let conn = Connection::open(path)?;
        init_db(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Other("storage connection mutex poisoned".to_string()))
    }
}

/// Adapter-boundary retry classification: BUSY and LOCKED are the two
/// driver failures worth re-running; everything else is permanent.
fn classify(err: rusqlite::Error) -> AppError {
    match err.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => {
            AppError::TransientStore(err.to_string())
        }
        _ => AppError::Db(err),
    }
}

fn read_view(tx: &Transaction, worker_id: i64) -> AppResult<TxnView> {
    // Worker + assigned venue in one joined lookup.
    let joined = tx
        .query_row(
            "SELECT w.id, w.name, w.venue_id, w.active,
                    v.id AS v_id, v.name AS v_name, v.latitude, v.longitude
             FROM workers w
             LEFT JOIN venues v ON v.id = w.venue_id
             WHERE w.id = ?1",
            params![worker_id],
            |row| {
                let worker = map_worker_row(row)?;
                let venue = match row.get::<_, Option<i64>>("v_id")? {
                    Some(id) => Some(Venue {
                        id,
                        name: row.get("v_name")?,
                        latitude: row.get("latitude")?,
                        longitude: row.get("longitude")?,
                    }),
                    None => None,
                };
                Ok((worker, venue))
            },
        )
        .optional()
        .map_err(classify)?;

    let (worker, venue) = match joined {
        Some((w, v)) => (Some(w), v),
        None => (None, None),
    };

    let latest = tx
        .query_row(
            "SELECT * FROM events
             WHERE worker_id = ?1
             ORDER BY recorded_at DESC, id DESC
             LIMIT 1",
            params![worker_id],
            map_event_row,
        )
        .optional()
        .map_err(classify)?;

    Ok(TxnView {
        worker,
        venue,
        latest,
    })
}

impl StoragePort for SqliteStore {
    fn create_atomic(&self, worker_id: i64, decide: Decide) -> AppResult<AttendanceEvent> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)
            .map_err(classify)?;

        let view = read_view(&tx, worker_id)?;
        let new = decide(&view)?;

        // Server clock, taken inside the transaction. Callers never get
        // to choose recorded_at. Truncated to the stored microsecond
        // precision so the returned row equals a later re-read.
        let now = Utc::now();
        let recorded_at = now
            .with_nanosecond(now.timestamp_subsec_micros() * 1000)
            .unwrap_or(now);

        tx.execute(
            "INSERT INTO events (worker_id, kind, comment, recorded_at, origin_lat, origin_lon)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                new.worker_id,
                new.kind.as_db_str(),
                new.comment.as_deref().unwrap_or(""),
                format_ts(recorded_at),
                new.origin.map(|(lat, _)| lat),
                new.origin.map(|(_, lon)| lon),
            ],
        )
        .map_err(classify)?;
        let id = tx.last_insert_rowid();

        tx.commit().map_err(classify)?;

        // Best-effort audit row, outside the event transaction.
        ttlog(
            &conn,
            new.kind.as_db_str(),
            &new.worker_id.to_string(),
            &format!("worker {} recorded '{}'", new.worker_id, new.kind.as_db_str()),
        )
        .ok();

        Ok(AttendanceEvent {
            id,
            worker_id: new.worker_id,
            kind: new.kind,
            comment: new.comment,
            recorded_at,
            origin_lat: new.origin.map(|(lat, _)| lat),
            origin_lon: new.origin.map(|(_, lon)| lon),
        })
    }

    fn get_latest(&self, worker_id: i64) -> AppResult<Option<AttendanceEvent>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT * FROM events
             WHERE worker_id = ?1
             ORDER BY recorded_at DESC, id DESC
             LIMIT 1",
            params![worker_id],
            map_event_row,
        )
        .optional()
        .map_err(classify)
    }

    fn list(&self, filter: &EventFilter) -> AppResult<Vec<AttendanceEvent>> {
        let conn = self.lock()?;

        let mut clauses: Vec<&str> = Vec::new();
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(worker_id) = filter.worker_id {
            clauses.push("worker_id = ?");
            args.push(Box::new(worker_id));
        }
        if let Some(kind) = filter.kind {
            clauses.push("kind = ?");
            args.push(Box::new(kind.as_db_str()));
        }
        if let Some(from) = filter.from {
            clauses.push("recorded_at >= ?");
            args.push(Box::new(format_ts(from)));
        }
        if let Some(to) = filter.to {
            clauses.push("recorded_at <= ?");
            args.push(Box::new(format_ts(to)));
        }

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let limit = filter.limit.unwrap_or(100);

        let sql = format!(
            "SELECT * FROM events {} ORDER BY recorded_at DESC, id DESC LIMIT {}",
            where_sql, limit
        );

        let mut stmt = conn.prepare(&sql).map_err(classify)?;
        let rows = stmt
            .query_map(
                rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
                map_event_row,
            )
            .map_err(classify)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r.map_err(classify)?);
        }
        Ok(out)
    }

    fn status_rows(&self) -> AppResult<Vec<StatusRow>> {
        let conn = self.lock()?;

        // Correlated latest-event lookup per worker; the index on
        // (worker_id, recorded_at DESC) keeps this off a full log scan.
        let mut stmt = conn
            .prepare(
                "SELECT w.id AS w_id, w.name AS w_name, w.venue_id, w.active,
                        v.id AS v_id, v.name AS v_name, v.latitude, v.longitude,
                        e.id, e.worker_id, e.kind, e.comment, e.recorded_at,
                        e.origin_lat, e.origin_lon
                 FROM workers w
                 LEFT JOIN venues v ON v.id = w.venue_id
                 LEFT JOIN events e ON e.id = (
                     SELECT id FROM events
                     WHERE worker_id = w.id
                     ORDER BY recorded_at DESC, id DESC
                     LIMIT 1
                 )
                 WHERE w.active = 1
                 ORDER BY w.name, w.id",
            )
            .map_err(classify)?;

        let rows = stmt
            .query_map([], |row| {
                let worker = Worker {
                    id: row.get("w_id")?,
                    name: row.get("w_name")?,
                    venue_id: row.get("venue_id")?,
                    active: row.get::<_, i64>("active")? == 1,
                };
                let venue = match row.get::<_, Option<i64>>("v_id")? {
                    Some(id) => Some(Venue {
                        id,
                        name: row.get("v_name")?,
                        latitude: row.get("latitude")?,
                        longitude: row.get("longitude")?,
                    }),
                    None => None,
                };
                let latest = match row.get::<_, Option<i64>>("id")? {
                    Some(_) => Some(map_event_row(row)?),
                    None => None,
                };
                Ok(StatusRow {
                    worker,
                    venue,
                    latest,
                })
            })
            .map_err(classify)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r.map_err(classify)?);
        }
        Ok(out)
    }
}
