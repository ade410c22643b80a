//! # Hub Runtime Library
//!
//! Wiring for the Donation Hub process. The `hub-runtime` binary is a thin
//! shell around this library so the same assembly runs in tests.
//!
//! ## Startup Sequence
//!
//! 1. Load `HubConfig` (TOML file from `HUB_CONFIG`, then env overrides)
//! 2. Install telemetry
//! 3. Build `RetryingStore<InMemoryEntityStore>`
//! 4. Seed configured users, skipping emails that already exist
//! 5. Build lifecycle, matching and workflow services plus the gateway
//! 6. Serve until ctrl-c or SIGTERM, then drain
//!
//! ```text
//!                 ┌──────────────────────┐
//!   HTTP ───────► │ dh-06 api gateway    │
//!                 └──┬────────┬───────┬──┘
//!                    ▼        ▼       ▼
//!               dh-03      dh-04    dh-05
//!                    │        │       │
//!                    └────────┼───────┘
//!                             ▼
//!                 RetryingStore<InMemoryEntityStore>
//! ```

pub mod config;
pub mod hub;
pub mod seed;
pub mod shutdown;

pub use config::{HubConfig, RuntimeConfigError, SeedConfig, SeedUser};
pub use hub::{build_hub, Hub, RuntimeError};
pub use seed::seed_users;
pub use shutdown::shutdown_signal;
