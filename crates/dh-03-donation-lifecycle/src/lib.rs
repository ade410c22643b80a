//! # DH-03 Donation Lifecycle Manager
//!
//! Owns the creation rules for a `Donation` and the only legal ways its
//! status may change.
//!
//! ## Status Machine
//!
//! ```text
//!   available ──► requested ──► collected ──► distributed ──► completed
//!       │             │             │              │
//!       └─────────────┴─────────────┴──────────────┴────────► cancelled
//! ```
//!
//! `completed` and `cancelled` are terminal. The edges live in one table,
//! [`DONATION_EDGES`], and [`apply_transition`] is the single place a status
//! is written. The volunteer workflow calls it too, so accepting a request
//! moves the donation along exactly the same edges.
//!
//! ## Operation Checks
//!
//! | Operation | Order of checks |
//! |-----------|-----------------|
//! | `create` | title, category, quantity, priority, images |
//! | `transition` | NotFound → Unauthorized → InvalidTransition |
//!
//! Writes go through `EntityStore::commit` with a version check. A lost race
//! is re-read and re-validated up to `max_conflict_retries` times.

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use config::{LifecycleConfig, LifecycleConfigError};
pub use domain::errors::{LifecycleError, LifecycleResult};
pub use domain::filter::DonationFilter;
pub use domain::new_donation::NewDonation;
pub use domain::state_machine::{
    allowed_from, apply_transition, can_transition, is_terminal, DONATION_EDGES,
};
pub use ports::inbound::DonationLifecycleApi;
pub use service::DonationLifecycleService;
