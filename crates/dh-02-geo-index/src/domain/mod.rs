//! Domain layer for the geospatial index.

pub mod bounds;
pub mod config;
pub mod distance;
pub mod grid;
