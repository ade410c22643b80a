//! Great-circle distance.

use shared_types::GeoPoint;
use std::f64::consts::PI;

/// Mean Earth radius used by every distance computation in the workspace.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Largest possible surface distance between two points.
pub const HALF_CIRCUMFERENCE_METERS: f64 = PI * EARTH_RADIUS_METERS;

/// Haversine distance between two points in meters.
pub fn haversine_meters(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1_rad = a.latitude().to_radians();
    let lat2_rad = b.latitude().to_radians();
    let delta_lat = (b.latitude() - a.latitude()).to_radians();
    let delta_lng = (b.longitude() - a.longitude()).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points.
    let c = 2.0 * h.min(1.0).sqrt().atan2((1.0 - h).max(0.0).sqrt());

    EARTH_RADIUS_METERS * c
}

pub fn km_to_meters(km: f64) -> f64 {
    km * 1_000.0
}

pub fn meters_to_km(meters: f64) -> f64 {
    meters / 1_000.0
}
