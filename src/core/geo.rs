//! Geofence validation: pure great-circle math, no I/O, no state.

use crate::errors::{AppError, AppResult};
use crate::models::venue::Venue;

/// Mean Earth radius in meters (IUGG spherical approximation).
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two WGS84 points via the Haversine
/// formula. Symmetric: `distance_m(a, b) == distance_m(b, a)`.
pub fn distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Validate a worker's position against the venue geofence.
///
/// Returns the rounded distance in meters for display and audit rows.
/// Errors:
/// - [`AppError::VenueNotGeolocated`] when the venue has no coordinates
/// - [`AppError::LocationRequired`] when the worker supplied none
/// - [`AppError::OutOfRange`] when the distance exceeds `max_m`
pub fn validate(origin: Option<(f64, f64)>, venue: &Venue, max_m: f64) -> AppResult<i64> {
    let (venue_lat, venue_lon) = venue
        .coordinates()
        .ok_or_else(|| AppError::VenueNotGeolocated(venue.name.clone()))?;

    let (lat, lon) = origin.ok_or(AppError::LocationRequired)?;

    let distance = distance_m(lat, lon, venue_lat, venue_lon);
    if distance > max_m {
        return Err(AppError::OutOfRange {
            distance_m: distance.round() as i64,
            max_m: max_m.round() as i64,
        });
    }

    Ok(distance.round() as i64)
}
