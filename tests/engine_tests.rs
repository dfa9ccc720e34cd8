//! Library-level tests for the attendance engine over the in-memory
//! storage adapter.

use shiftlog::config::Config;
use shiftlog::core::attendance::AttendanceStore;
use shiftlog::core::geo;
use shiftlog::core::status::LiveStatusAggregator;
use shiftlog::errors::AppError;
use shiftlog::models::event::{CreateRequest, EventFilter, OriginFix};
use shiftlog::models::event_type::EventType;
use shiftlog::models::status::DutyState;
use shiftlog::models::venue::Venue;
use shiftlog::models::worker::Worker;
use shiftlog::store::memory::MemoryStore;
use shiftlog::store::StoragePort;
use chrono::{Duration, Utc};
use std::sync::Arc;

mod common;
use common::lat_degrees_for_meters;

fn test_cfg() -> Config {
    Config {
        database: ":memory:".to_string(),
        storage: "memory".to_string(),
        geofence_radius_m: 500.0,
        stale_after_hours: 12,
        max_fix_age_secs: 90,
        retry_max_attempts: 3,
        retry_initial_delay_ms: 1,
        retry_max_delay_ms: 4,
    }
}

/// Standard fixture: venue 1 at (0, 0), worker 1 assigned to it,
/// worker 2 unassigned, worker 3 assigned to a venue without
/// coordinates.
fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.seed_venue(Venue {
        id: 1,
        name: "Club Aurora".to_string(),
        latitude: Some(0.0),
        longitude: Some(0.0),
    });
    store.seed_venue(Venue {
        id: 2,
        name: "Loft 21".to_string(),
        latitude: None,
        longitude: None,
    });
    store.seed_worker(Worker {
        id: 1,
        name: "Nora".to_string(),
        venue_id: Some(1),
        active: true,
    });
    store.seed_worker(Worker {
        id: 2,
        name: "Milo".to_string(),
        venue_id: None,
        active: true,
    });
    store.seed_worker(Worker {
        id: 3,
        name: "Iris".to_string(),
        venue_id: Some(2),
        active: true,
    });
    store
}

fn engine(store: Arc<MemoryStore>) -> AttendanceStore {
    AttendanceStore::new(store, &test_cfg())
}

fn at_venue() -> Option<OriginFix> {
    Some(OriginFix {
        latitude: 0.0,
        longitude: 0.0,
        captured_at: None,
    })
}

fn check_in(worker_id: i64, origin: Option<OriginFix>) -> CreateRequest {
    CreateRequest {
        worker_id,
        kind: EventType::CheckIn,
        comment: None,
        origin,
    }
}

fn check_out(worker_id: i64) -> CreateRequest {
    CreateRequest {
        worker_id,
        kind: EventType::CheckOut,
        comment: None,
        origin: None,
    }
}

// ---------------------------------------------------------------
// GeoValidator
// ---------------------------------------------------------------

#[test]
fn distance_is_zero_for_identical_points() {
    assert_eq!(geo::distance_m(45.464, 9.19, 45.464, 9.19), 0.0);
}

#[test]
fn distance_is_symmetric() {
    let ab = geo::distance_m(41.9028, 12.4964, 45.4642, 9.19);
    let ba = geo::distance_m(45.4642, 9.19, 41.9028, 12.4964);
    assert!((ab - ba).abs() < 1e-9);
}

#[test]
fn distance_along_a_meridian_matches_arc_length() {
    // 1 degree of latitude on the spherical model.
    let d = geo::distance_m(0.0, 0.0, 1.0, 0.0);
    let expected = 6_371_000.0 * std::f64::consts::PI / 180.0;
    assert!((d - expected).abs() < 0.01, "got {}", d);
}

// ---------------------------------------------------------------
// Sequencing
// ---------------------------------------------------------------

#[test]
fn first_event_must_be_check_in() {
    let engine = engine(seeded_store());

    let err = engine.create(&check_out(1)).unwrap_err();
    match err {
        AppError::SequenceViolation { expected } => assert_eq!(expected, EventType::CheckIn),
        other => panic!("unexpected error: {other}"),
    }

    let ev = engine.create(&check_in(1, at_venue())).unwrap();
    assert_eq!(ev.kind, EventType::CheckIn);
    assert_eq!(ev.worker_id, 1);
    assert!(ev.origin().is_some());
}

#[test]
fn double_check_in_is_rejected() {
    let engine = engine(seeded_store());

    engine.create(&check_in(1, at_venue())).unwrap();
    let err = engine.create(&check_in(1, at_venue())).unwrap_err();
    match err {
        AppError::SequenceViolation { expected } => assert_eq!(expected, EventType::CheckOut),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn check_in_out_cycle_repeats() {
    let engine = engine(seeded_store());

    for _ in 0..3 {
        engine.create(&check_in(1, at_venue())).unwrap();
        engine.create(&check_out(1)).unwrap();
    }
    let latest = engine.get_latest(1).unwrap().unwrap();
    assert_eq!(latest.kind, EventType::CheckOut);
}

#[test]
fn unknown_worker_is_rejected() {
    let engine = engine(seeded_store());
    let err = engine.create(&check_in(99, at_venue())).unwrap_err();
    assert!(matches!(err, AppError::WorkerNotFound(99)));
}

// ---------------------------------------------------------------
// Geofence on check-in
// ---------------------------------------------------------------

#[test]
fn check_in_inside_the_geofence_succeeds() {
    let engine = engine(seeded_store());
    let fix = OriginFix {
        latitude: lat_degrees_for_meters(499.0),
        longitude: 0.0,
        captured_at: None,
    };
    engine.create(&check_in(1, Some(fix))).unwrap();
}

#[test]
fn check_in_outside_the_geofence_fails_with_distance() {
    let engine = engine(seeded_store());
    let fix = OriginFix {
        latitude: lat_degrees_for_meters(501.0),
        longitude: 0.0,
        captured_at: None,
    };
    let err = engine.create(&check_in(1, Some(fix))).unwrap_err();
    match err {
        AppError::OutOfRange { distance_m, max_m } => {
            assert_eq!(distance_m, 501);
            assert_eq!(max_m, 500);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn check_in_without_assigned_venue_fails() {
    let engine = engine(seeded_store());
    let err = engine.create(&check_in(2, at_venue())).unwrap_err();
    assert!(matches!(err, AppError::VenueNotAssigned(2)));
}

#[test]
fn check_in_at_non_geolocated_venue_fails() {
    let engine = engine(seeded_store());
    let err = engine.create(&check_in(3, at_venue())).unwrap_err();
    match err {
        AppError::VenueNotGeolocated(name) => assert_eq!(name, "Loft 21"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn check_in_without_coordinates_fails() {
    let engine = engine(seeded_store());
    let err = engine.create(&check_in(1, None)).unwrap_err();
    assert!(matches!(err, AppError::LocationRequired));
}

#[test]
fn check_in_with_an_old_fix_fails() {
    let engine = engine(seeded_store());
    let fix = OriginFix {
        latitude: 0.0,
        longitude: 0.0,
        captured_at: Some(Utc::now() - Duration::seconds(300)),
    };
    let err = engine.create(&check_in(1, Some(fix))).unwrap_err();
    match err {
        AppError::StaleLocation { max_secs, .. } => assert_eq!(max_secs, 90),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn check_out_needs_no_venue_or_coordinates() {
    let store = seeded_store();
    let engine = engine(store.clone());

    engine.create(&check_in(1, at_venue())).unwrap();
    // Unassign the venue mid-shift; the checkout must still go through.
    store.seed_worker(Worker {
        id: 1,
        name: "Nora".to_string(),
        venue_id: None,
        active: true,
    });
    engine.create(&check_out(1)).unwrap();
}

// ---------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------

#[test]
fn concurrent_check_ins_have_exactly_one_winner() {
    let store = seeded_store();
    let engine = Arc::new(engine(store.clone()));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = engine.clone();
        handles.push(std::thread::spawn(move || {
            engine.create(&check_in(1, at_venue()))
        }));
    }

    let mut ok = 0;
    let mut violations = 0;
    for h in handles {
        match h.join().unwrap() {
            Ok(_) => ok += 1,
            Err(AppError::SequenceViolation { .. }) => violations += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(violations, 7);

    // No duplicate on-duty rows: exactly one check-in persisted.
    let events = store
        .list(&EventFilter {
            worker_id: Some(1),
            ..EventFilter::default()
        })
        .unwrap();
    assert_eq!(events.len(), 1);
}

// ---------------------------------------------------------------
// Listing
// ---------------------------------------------------------------

#[test]
fn list_is_bounded_and_descending() {
    let engine = engine(seeded_store());

    for _ in 0..4 {
        engine.create(&check_in(1, at_venue())).unwrap();
        engine.create(&check_out(1)).unwrap();
    }

    let events = engine
        .list(&EventFilter {
            worker_id: Some(1),
            limit: Some(5),
            ..EventFilter::default()
        })
        .unwrap();

    assert_eq!(events.len(), 5);
    for pair in events.windows(2) {
        assert!(pair[0].recorded_at >= pair[1].recorded_at);
    }
    // Latest of the 8 events is a check-out.
    assert_eq!(events[0].kind, EventType::CheckOut);
}

#[test]
fn list_filters_by_kind() {
    let engine = engine(seeded_store());

    engine.create(&check_in(1, at_venue())).unwrap();
    engine.create(&check_out(1)).unwrap();

    let ins = engine
        .list(&EventFilter {
            kind: Some(EventType::CheckIn),
            ..EventFilter::default()
        })
        .unwrap();
    assert_eq!(ins.len(), 1);
    assert_eq!(ins[0].kind, EventType::CheckIn);
}

// ---------------------------------------------------------------
// Live snapshot
// ---------------------------------------------------------------

#[test]
fn snapshot_reports_duty_states() {
    let store = seeded_store();
    let engine = engine(store.clone());
    engine.create(&check_in(1, at_venue())).unwrap();

    let aggregator = LiveStatusAggregator::with_stale_after(store, 12);
    let snapshot = aggregator.snapshot().unwrap();

    // Sorted by name: Iris, Milo, Nora.
    assert_eq!(snapshot.len(), 3);
    assert_eq!(snapshot[2].worker.name, "Nora");
    assert_eq!(snapshot[2].state, DutyState::OnDuty);
    assert!(snapshot[2].since.is_some());
    assert_eq!(snapshot[2].last_origin, Some((0.0, 0.0)));

    assert_eq!(snapshot[1].worker.name, "Milo");
    assert_eq!(snapshot[1].state, DutyState::OffDuty);
    assert!(snapshot[1].since.is_none());
}

#[test]
fn open_shift_turns_stale_after_the_threshold() {
    let store = seeded_store();
    let engine = engine(store.clone());
    let ev = engine.create(&check_in(1, at_venue())).unwrap();

    let aggregator = LiveStatusAggregator::with_stale_after(store, 12);

    let at_11h = aggregator
        .snapshot_at(ev.recorded_at + Duration::hours(11))
        .unwrap();
    assert_eq!(at_11h[2].state, DutyState::OnDuty);

    let at_13h = aggregator
        .snapshot_at(ev.recorded_at + Duration::hours(13))
        .unwrap();
    assert_eq!(at_13h[2].state, DutyState::StaleOnDuty);
}

#[test]
fn snapshot_skips_inactive_workers() {
    let store = seeded_store();
    store.seed_worker(Worker {
        id: 4,
        name: "Remi".to_string(),
        venue_id: None,
        active: false,
    });

    let aggregator = LiveStatusAggregator::with_stale_after(store, 12);
    let snapshot = aggregator.snapshot().unwrap();
    assert!(snapshot.iter().all(|s| s.worker.id != 4));
}
