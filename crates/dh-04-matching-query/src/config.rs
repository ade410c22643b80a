//! Matching configuration.

use dh_02_geo_index::HALF_CIRCUMFERENCE_METERS;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Radius used when the caller gives none.
    pub default_radius_km: f64,
    /// Larger radii are clamped to this.
    pub max_radius_km: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            default_radius_km: 10.0,
            max_radius_km: HALF_CIRCUMFERENCE_METERS / 1000.0,
        }
    }
}

impl MatchingConfig {
    pub fn validate(&self) -> Result<(), MatchingConfigError> {
        if !(self.default_radius_km.is_finite() && self.default_radius_km > 0.0) {
            return Err(MatchingConfigError::InvalidDefaultRadius(
                self.default_radius_km,
            ));
        }
        if !(self.max_radius_km.is_finite() && self.max_radius_km >= self.default_radius_km) {
            return Err(MatchingConfigError::InvalidMaxRadius(self.max_radius_km));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchingConfigError {
    #[error("default_radius_km must be a positive number, got {0}")]
    InvalidDefaultRadius(f64),

    #[error("max_radius_km must be finite and at least the default radius, got {0}")]
    InvalidMaxRadius(f64),
}
