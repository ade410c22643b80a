//! Index configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Grid geometry for [`GeoIndex`](super::grid::GeoIndex).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoIndexConfig {
    /// Edge length of a grid cell in degrees. Smaller cells scan fewer
    /// candidates for small radii and more cells for large ones.
    pub cell_size_degrees: f64,
}

impl Default for GeoIndexConfig {
    fn default() -> Self {
        Self {
            cell_size_degrees: 0.5,
        }
    }
}

impl GeoIndexConfig {
    pub fn validate(&self) -> Result<(), GeoIndexError> {
        let size = self.cell_size_degrees;
        if !size.is_finite() || size <= 0.0 || size > 90.0 {
            return Err(GeoIndexError::InvalidCellSize(size));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoIndexError {
    #[error("cell size must be in (0, 90] degrees, got {0}")]
    InvalidCellSize(f64),
}
