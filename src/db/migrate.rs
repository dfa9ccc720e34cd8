//! Idempotent schema migrations, tracked via PRAGMA user_version.

use crate::ui::messages::success;
use rusqlite::{Connection, Result};

/// Schema version this build expects.
const SCHEMA_VERSION: i64 = 2;

fn schema_version(conn: &Connection) -> Result<i64> {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
}

fn set_schema_version(conn: &Connection, v: i64) -> Result<()> {
    // PRAGMA does not accept bound parameters.
    conn.execute_batch(&format!("PRAGMA user_version = {};", v))?;
    Ok(())
}

/// v1: directory mirror (venues, workers) + append-only event log.
fn create_base_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS venues (
            id        INTEGER PRIMARY KEY,
            name      TEXT NOT NULL,
            latitude  REAL,
            longitude REAL
        );

        CREATE TABLE IF NOT EXISTS workers (
            id       INTEGER PRIMARY KEY,
            name     TEXT NOT NULL,
            venue_id INTEGER REFERENCES venues(id),
            active   INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS events (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            worker_id   INTEGER NOT NULL,
            kind        TEXT NOT NULL CHECK(kind IN ('in','out')),
            comment     TEXT DEFAULT '',
            recorded_at TEXT NOT NULL,
            origin_lat  REAL,
            origin_lon  REAL
        );

        CREATE INDEX IF NOT EXISTS idx_events_worker_recorded
            ON events(worker_id, recorded_at DESC);
        "#,
    )?;
    Ok(())
}

/// v2: internal audit log table.
fn create_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Bring the database up to the current schema. Safe to call on every
/// open: already-applied steps are skipped.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    let current = schema_version(conn)?;

    if current < 1 {
        create_base_schema(conn)?;
        set_schema_version(conn, 1)?;
        success("Schema v1 applied (venues, workers, events).");
    }

    if current < 2 {
        create_log_table(conn)?;
        set_schema_version(conn, 2)?;
    }

    debug_assert!(schema_version(conn)? == SCHEMA_VERSION);
    Ok(())
}
