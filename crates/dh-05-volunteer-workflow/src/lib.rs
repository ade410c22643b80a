//! # DH-05 Volunteer Request Workflow
//!
//! A volunteer claims a donation with a `VolunteerRequest`; the donor and the
//! volunteer then move it through collection and distribution.
//!
//! ## Status Machine
//!
//! ```text
//!   pending ──► accepted ──► collected ──► distributed ──► completed
//!     │  │          │            │              │
//!     │  └──────────┴────────────┴──────────────┴──────► cancelled
//!     └──► rejected
//! ```
//!
//! ## Who May Set What
//!
//! | Target | Donor | Volunteer |
//! |--------|:-----:|:---------:|
//! | accepted, rejected | ✓ | |
//! | collected, distributed | | ✓ |
//! | cancelled, completed | ✓ | ✓ |
//!
//! Admins may read any request but have no override on transitions.
//!
//! ## Side Effects
//!
//! | New status | Also written in the same `WriteBatch` |
//! |------------|---------------------------------------|
//! | accepted | donation `available → requested` via the lifecycle edge table |
//! | completed | volunteer `points += points_per_completion` |
//!
//! The batch commits all-or-nothing with version checks, so a request is
//! never `accepted` while its donation is still `available`.
//!
//! ## Uniqueness
//!
//! At most one active (not rejected, not cancelled) request exists per
//! (donation, volunteer). The store's `requests.active_pair` index decides
//! races; a read-side check beforehand gives the same answer for a plain
//! repeat even once the donation has left `available`.

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use config::{WorkflowConfig, WorkflowConfigError};
pub use domain::authorization::{may_set, party_of, Party};
pub use domain::details::{RequestDetails, StatusChange};
pub use domain::errors::{WorkflowError, WorkflowResult};
pub use domain::state_machine::{
    allowed_from, apply_transition, can_transition, is_terminal, REQUEST_EDGES,
};
pub use ports::inbound::VolunteerWorkflowApi;
pub use service::VolunteerWorkflowService;
