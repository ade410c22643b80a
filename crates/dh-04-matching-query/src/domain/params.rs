//! Parsing of raw nearby-query arguments.

use crate::domain::errors::{MatchingError, MatchingResult};

/// Numeric arguments of a nearby query, parsed but not yet range-checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyParams {
    pub longitude: f64,
    pub latitude: f64,
    /// Kilometers. `None` means the configured default.
    pub radius_km: Option<f64>,
}

impl NearbyParams {
    /// Parse query-string values. Never panics on missing or garbage input.
    pub fn parse(lon: Option<&str>, lat: Option<&str>, radius: Option<&str>) -> MatchingResult<Self> {
        let radius = match radius.map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(number("radius", raw)?),
        };
        Ok(Self {
            longitude: required("lon", lon)?,
            latitude: required("lat", lat)?,
            radius_km: radius,
        })
    }
}

fn required(name: &str, raw: Option<&str>) -> MatchingResult<f64> {
    match raw.map(str::trim) {
        None | Some("") => Err(MatchingError::Validation(format!("{name} is required"))),
        Some(raw) => number(name, raw),
    }
}

fn number(name: &str, raw: &str) -> MatchingResult<f64> {
    raw.parse::<f64>()
        .map_err(|_| MatchingError::Validation(format!("{name} must be a number, got '{raw}'")))
}
