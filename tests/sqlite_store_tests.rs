//! The SQLite adapter exercised through the engine, without the CLI.

use shiftlog::config::Config;
use shiftlog::core::attendance::AttendanceStore;
use shiftlog::db::pool::DbPool;
use shiftlog::db::queries::{upsert_venue, upsert_worker};
use shiftlog::errors::AppError;
use shiftlog::models::event::{CreateRequest, EventFilter, OriginFix};
use shiftlog::models::event_type::EventType;
use shiftlog::models::venue::Venue;
use shiftlog::models::worker::Worker;
use shiftlog::store::StoragePort;
use shiftlog::store::sqlite::SqliteStore;
use chrono::Utc;
use std::sync::Arc;

mod common;
use common::setup_test_db;

fn seeded_sqlite(name: &str) -> (Arc<SqliteStore>, String) {
    let db_path = setup_test_db(name);

    // Opening runs the migrations; seed the directory mirror directly.
    let store = SqliteStore::open(&db_path).expect("open store");
    let mut pool = DbPool::new(&db_path).expect("open pool");
    pool.with_conn(|conn| {
        upsert_venue(
            conn,
            &Venue {
                id: 1,
                name: "Club Aurora".to_string(),
                latitude: Some(0.0),
                longitude: Some(0.0),
            },
        )?;
        upsert_worker(
            conn,
            &Worker {
                id: 1,
                name: "Nora".to_string(),
                venue_id: Some(1),
                active: true,
            },
        )?;
        Ok(())
    })
    .expect("seed directory");

    (Arc::new(store), db_path)
}

fn cfg() -> Config {
    Config {
        database: String::new(),
        storage: "sqlite".to_string(),
        geofence_radius_m: 500.0,
        stale_after_hours: 12,
        max_fix_age_secs: 90,
        retry_max_attempts: 3,
        retry_initial_delay_ms: 1,
        retry_max_delay_ms: 4,
    }
}

fn check_in(worker_id: i64) -> CreateRequest {
    CreateRequest {
        worker_id,
        kind: EventType::CheckIn,
        comment: Some("opening".to_string()),
        origin: Some(OriginFix {
            latitude: 0.0,
            longitude: 0.0,
            captured_at: None,
        }),
    }
}

#[test]
fn create_persists_and_round_trips() {
    let (store, _) = seeded_sqlite("sqlite_roundtrip");
    let engine = AttendanceStore::new(store.clone(), &cfg());

    let before = Utc::now();
    let ev = engine.create(&check_in(1)).expect("check in");
    let after = Utc::now();

    // recorded_at comes from the server clock inside the transaction
    // (truncated to stored microsecond precision).
    assert!(ev.recorded_at >= before - chrono::Duration::microseconds(1));
    assert!(ev.recorded_at <= after);
    assert_eq!(ev.comment.as_deref(), Some("opening"));

    let latest = store.get_latest(1).expect("latest").expect("some");
    assert_eq!(latest.id, ev.id);
    assert_eq!(latest.kind, EventType::CheckIn);
    assert_eq!(latest.recorded_at, ev.recorded_at);
    assert_eq!(latest.origin(), Some((0.0, 0.0)));
}

#[test]
fn sequence_violation_leaves_nothing_behind() {
    let (store, _) = seeded_sqlite("sqlite_rollback");
    let engine = AttendanceStore::new(store.clone(), &cfg());

    engine.create(&check_in(1)).expect("first check in");
    let err = engine.create(&check_in(1)).unwrap_err();
    assert!(matches!(err, AppError::SequenceViolation { .. }));

    let events = store
        .list(&EventFilter {
            worker_id: Some(1),
            ..EventFilter::default()
        })
        .expect("list");
    assert_eq!(events.len(), 1);
}

#[test]
fn list_filters_by_time_window() {
    let (store, _) = seeded_sqlite("sqlite_window");
    let engine = AttendanceStore::new(store.clone(), &cfg());

    let ev = engine.create(&check_in(1)).expect("check in");

    let hit = store
        .list(&EventFilter {
            from: Some(ev.recorded_at),
            to: Some(ev.recorded_at),
            ..EventFilter::default()
        })
        .expect("list");
    assert_eq!(hit.len(), 1);

    let miss = store
        .list(&EventFilter {
            to: Some(ev.recorded_at - chrono::Duration::seconds(1)),
            ..EventFilter::default()
        })
        .expect("list");
    assert!(miss.is_empty());
}

#[test]
fn status_rows_correlate_worker_venue_and_latest_event() {
    let (store, _) = seeded_sqlite("sqlite_status");
    let engine = AttendanceStore::new(store.clone(), &cfg());
    engine.create(&check_in(1)).expect("check in");

    let rows = store.status_rows().expect("status rows");
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.worker.name, "Nora");
    assert_eq!(row.venue.as_ref().map(|v| v.name.as_str()), Some("Club Aurora"));
    assert_eq!(
        row.latest.as_ref().map(|e| e.kind),
        Some(EventType::CheckIn)
    );
}
