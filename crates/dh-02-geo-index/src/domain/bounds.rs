//! Bounding boxes around a search circle.
//!
//! The box is a latitude band plus one or two longitude spans. It is
//! conservative: every point within the radius lies inside the box, so the
//! haversine post-filter only ever removes candidates.

use super::distance::EARTH_RADIUS_METERS;
use shared_types::GeoPoint;
use std::f64::consts::FRAC_PI_2;

/// Inclusive longitude range in degrees, `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LonSpan {
    pub min: f64,
    pub max: f64,
}

impl LonSpan {
    const WORLD: LonSpan = LonSpan {
        min: -180.0,
        max: 180.0,
    };

    pub fn contains(&self, lon: f64) -> bool {
        lon >= self.min && lon <= self.max
    }
}

/// Latitude band with the longitude spans it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    /// One span, or two when the box crosses the antimeridian.
    pub spans: Vec<LonSpan>,
}

impl BoundingBox {
    /// The whole globe.
    pub fn world() -> Self {
        Self {
            min_lat: -90.0,
            max_lat: 90.0,
            spans: vec![LonSpan::WORLD],
        }
    }

    /// Smallest box containing every point within `radius_m` of `center`.
    pub fn around(center: &GeoPoint, radius_m: f64) -> Self {
        let angular = radius_m.max(0.0) / EARTH_RADIUS_METERS;
        let lat = center.latitude().to_radians();
        let min_lat = lat - angular;
        let max_lat = lat + angular;

        // Circle reaches a pole: every meridian is crossed.
        if min_lat <= -FRAC_PI_2 || max_lat >= FRAC_PI_2 {
            return Self {
                min_lat: min_lat.to_degrees().max(-90.0),
                max_lat: max_lat.to_degrees().min(90.0),
                spans: vec![LonSpan::WORLD],
            };
        }

        let delta_lon = (angular.sin() / lat.cos()).asin().to_degrees();
        let lon = center.longitude();
        let min_lon = lon - delta_lon;
        let max_lon = lon + delta_lon;

        let spans = if min_lon < -180.0 {
            vec![
                LonSpan {
                    min: min_lon + 360.0,
                    max: 180.0,
                },
                LonSpan {
                    min: -180.0,
                    max: max_lon,
                },
            ]
        } else if max_lon > 180.0 {
            vec![
                LonSpan {
                    min: min_lon,
                    max: 180.0,
                },
                LonSpan {
                    min: -180.0,
                    max: max_lon - 360.0,
                },
            ]
        } else {
            vec![LonSpan {
                min: min_lon,
                max: max_lon,
            }]
        };

        Self {
            min_lat: min_lat.to_degrees(),
            max_lat: max_lat.to_degrees(),
            spans,
        }
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        let lat = point.latitude();
        lat >= self.min_lat
            && lat <= self.max_lat
            && self.spans.iter().any(|s| s.contains(point.longitude()))
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.spans.len() > 1
    }
}
