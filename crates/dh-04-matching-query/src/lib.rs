//! # DH-04 Matching Query Service
//!
//! Answers "which donations can I pick up near here?".
//!
//! ```text
//! (lon, lat, radius_km?) ──► NearbyParams::parse ──► find_nearby
//!                                                      │
//!            radius ≤ 0 ──► []                         │ km → m, clamp
//!                                                      ▼
//!                         EntityStore::donations_within(center, m, available)
//!                                                      │
//!                                                      ▼
//!                                 [NearbyDonation] nearest first
//! ```
//!
//! | Input | Result |
//! |-------|--------|
//! | radius omitted | configured default (10 km) |
//! | radius ≤ 0 | empty list, store not queried |
//! | radius NaN / ±∞ | validation error |
//! | radius above the maximum | clamped to the maximum |
//! | lon/lat missing, non-numeric or out of range | validation error |

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use config::{MatchingConfig, MatchingConfigError};
pub use domain::errors::{MatchingError, MatchingResult};
pub use domain::params::NearbyParams;
pub use ports::inbound::MatchingQueryApi;
pub use service::MatchingQueryService;
