//! # DH-02 Geospatial Index
//!
//! Proximity queries over point locations on a sphere model of the Earth.
//!
//! ## Architecture
//!
//! Pure domain crate, no I/O:
//!
//! - `domain/distance.rs`: haversine great-circle distance and unit conversion
//! - `domain/bounds.rs`: bounding box around a point, pole and antimeridian aware
//! - `domain/grid.rs`: `GeoIndex<K>`, a grid-cell index with nearest-first `within`
//! - `domain/config.rs`: cell size with validation
//!
//! ## Query Algorithm
//!
//! ```text
//! center + radius ──► BoundingBox (lat band + 1..2 lon spans)
//!                          │
//!                          ▼
//!                 grid cells overlapping the box
//!                          │
//!                          ▼
//!              haversine post-filter (d <= radius)
//!                          │
//!                          ▼
//!                sort by (distance, key) ascending
//! ```
//!
//! ## Invariants
//!
//! - Every returned entry lies within the radius measured by haversine.
//! - No entry within the radius is missed because of the cell scan.
//! - Results are ordered nearest-first; equal distances order by key.

pub mod domain;

pub use domain::bounds::{BoundingBox, LonSpan};
pub use domain::config::{GeoIndexConfig, GeoIndexError};
pub use domain::distance::{
    haversine_meters, km_to_meters, meters_to_km, EARTH_RADIUS_METERS,
    HALF_CIRCUMFERENCE_METERS,
};
pub use domain::grid::GeoIndex;
