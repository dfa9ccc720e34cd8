use crate::errors::AppError;
use crate::models::event::AttendanceEvent;
use crate::models::event_type::EventType;
use crate::models::venue::Venue;
use crate::models::worker::Worker;
use crate::utils::time::parse_ts;
use rusqlite::{Connection, Result, Row, params};

/// Map one `events` row. Column names, not indexes: the snapshot query
/// aliases its event columns to match.
pub fn map_event_row(row: &Row) -> Result<AttendanceEvent> {
    let kind_str: String = row.get("kind")?;
    let kind = EventType::from_db_str(&kind_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidEventKind(kind_str.clone())),
        )
    })?;

    let ts_str: String = row.get("recorded_at")?;
    let recorded_at = parse_ts(&ts_str).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidTimestamp(ts_str.clone())),
        )
    })?;

    let comment: Option<String> = row.get("comment")?;

    Ok(AttendanceEvent {
        id: row.get("id")?,
        worker_id: row.get("worker_id")?,
        kind,
        comment: comment.filter(|c| !c.is_empty()),
        recorded_at,
        origin_lat: row.get("origin_lat")?,
        origin_lon: row.get("origin_lon")?,
    })
}

pub fn map_worker_row(row: &Row) -> Result<Worker> {
    Ok(Worker {
        id: row.get("id")?,
        name: row.get("name")?,
        venue_id: row.get("venue_id")?,
        active: row.get::<_, i64>("active")? == 1,
    })
}

/// Refresh one venue of the directory mirror (used by `sync`).
pub fn upsert_venue(conn: &Connection, v: &Venue) -> Result<()> {
    conn.execute(
        "INSERT INTO venues (id, name, latitude, longitude)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
             name = excluded.name,
             latitude = excluded.latitude,
             longitude = excluded.longitude",
        params![v.id, v.name, v.latitude, v.longitude],
    )?;
    Ok(())
}

/// Refresh one worker of the directory mirror (used by `sync`).
pub fn upsert_worker(conn: &Connection, w: &Worker) -> Result<()> {
    conn.execute(
        "INSERT INTO workers (id, name, venue_id, active)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
             name = excluded.name,
             venue_id = excluded.venue_id,
             active = excluded.active",
        params![w.id, w.name, w.venue_id, if w.active { 1 } else { 0 }],
    )?;
    Ok(())
}
