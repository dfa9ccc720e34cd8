#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn slog() -> Command {
    cargo_bin_cmd!("shiftlog")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_shiftlog.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Write a directory export fixture and return its path.
///
/// Layout: venue 1 at (0, 0) with coordinates, venue 2 without;
/// worker 1 assigned to venue 1, worker 2 unassigned, worker 3
/// assigned to the non-geolocated venue 2.
pub fn write_directory_fixture(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_directory.json", name));
    let json_path = path.to_string_lossy().to_string();

    let json = r#"{
        "venues": [
            {"id": 1, "name": "Club Aurora", "latitude": 0.0, "longitude": 0.0},
            {"id": 2, "name": "Loft 21"}
        ],
        "workers": [
            {"id": 1, "name": "Nora", "venue_id": 1},
            {"id": 2, "name": "Milo", "venue_id": null},
            {"id": 3, "name": "Iris", "venue_id": 2}
        ]
    }"#;

    fs::write(&json_path, json).expect("write directory fixture");
    json_path
}

/// Initialize the DB schema and load the standard directory fixture.
pub fn init_db_with_directory(name: &str) -> String {
    let db_path = setup_test_db(name);
    let dir_path = write_directory_fixture(name);

    slog()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    slog()
        .args(["--db", &db_path, "sync", &dir_path])
        .assert()
        .success();

    db_path
}

/// Degrees of latitude covering roughly `meters` on the spherical model
/// used by the geofence (exact along a meridian).
pub fn lat_degrees_for_meters(meters: f64) -> f64 {
    meters / (6_371_000.0 * std::f64::consts::PI / 180.0)
}
