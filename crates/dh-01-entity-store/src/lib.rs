//! # DH-01 Entity Store
//!
//! Persistence collaborator for the Donation Hub core. Stores `User`,
//! `Donation` and `VolunteerRequest` records, enforces the unique indexes the
//! workflow relies on and applies multi-document updates atomically.
//!
//! ## Architecture
//!
//! - **Domain** (`domain/`): `StoreError`, `WriteBatch`, query filters
//! - **Ports** (`ports/`): `EntityStore`, the async trait every service
//!   depends on as `Arc<dyn EntityStore>`
//! - **Adapters** (`adapters/`):
//!   - `InMemoryEntityStore`: reference implementation with an embedded
//!     `GeoIndex` and a `FaultPlan` hook for failure injection
//!   - `RetryingStore<S>`: exponential backoff around transient failures
//! - **Deadline** (`deadline.rs`): bounds a storage future by a `Deadline`
//!
//! ## Guarantees
//!
//! | Guarantee | Mechanism |
//! |-----------|-----------|
//! | Unique email | `users.email` index checked under the write lock |
//! | One active request per (donation, volunteer) | `requests.active_pair` index, serializable check-then-insert |
//! | All-or-nothing multi-document update | `commit(WriteBatch)` stages every op before publishing |
//! | No lost updates | per-entity `version`, checked on commit |
//! | Immutable references | commit rejects changes to donor/donation/volunteer links |
//!
//! ## Commit Flow
//!
//! ```text
//! WriteBatch[op0, op1, ...]
//!        │  (write lock held)
//!        ▼
//!   stage op0 ──► stage op1 ──► ... ──► publish (infallible)
//!        │             │
//!        └──── any error: discard staging, store untouched
//! ```

pub mod adapters;
pub mod config;
pub mod deadline;
pub mod domain;
pub mod ports;

pub use adapters::faults::FaultPlan;
pub use adapters::memory::{InMemoryEntityStore, StoreStats};
pub use adapters::retry::{RetryObserver, RetryingStore};
pub use config::{RetryPolicy, StoreConfig, StoreConfigError};
pub use deadline::with_deadline;
pub use domain::batch::{WriteBatch, WriteOp};
pub use domain::errors::{EntityKind, StoreError, ACTIVE_REQUEST_INDEX, EMAIL_INDEX};
pub use domain::query::{DonationQuery, NearbyDonation, RequestQuery};
pub use ports::inbound::EntityStore;
