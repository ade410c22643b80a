//! # DH-06 API Gateway
//!
//! The REST surface of the Donation Hub. Resolves the caller from a bearer
//! credential, hands typed inputs to the core services and turns every
//! failure into a status code plus a `{"error":{"kind","message"}}` body.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       API GATEWAY (dh-06)                        │
//! ├──────────────────────────────────────────────────────────────────┤
//! │   HTTP :8080                                                     │
//! │      │                                                           │
//! │  ┌───┴──────────────────────────────────────────┐                │
//! │  │ Middleware: Tracing → Timeout → CORS         │                │
//! │  └───┬──────────────────────────────────────────┘                │
//! │      │                                                           │
//! │  ┌───┴──────────────┐   ┌─────────────────────┐                  │
//! │  │ Extractors       │──►│ Authenticator port  │                  │
//! │  │ Caller / ApiJson │   │ (StaticTokens)      │                  │
//! │  └───┬──────────────┘   └─────────────────────┘                  │
//! │      │                                                           │
//! │  ┌───┴──────────────────────────────────────────┐                │
//! │  │ Handlers: donations, volunteers, users, sys  │                │
//! │  └───┬──────────────────────────────────────────┘                │
//! └──────┼───────────────────────────────────────────────────────────┘
//!        ▼
//!  dh-03 lifecycle    dh-04 matching    dh-05 workflow
//! ```
//!
//! ## Status Mapping
//!
//! | Kind | Status |
//! |------|--------|
//! | `validation_error` | 400 |
//! | `unauthenticated` | 401 |
//! | `unauthorized` | 403 |
//! | `not_found` | 404 |
//! | `duplicate_request`, `invalid_transition` | 409 |
//! | `storage_error` | 500, or 504 when the request timed out |
//!
//! Storage details never reach the client; they are logged with
//! `tracing::error!` and replaced by a generic message.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod ports;
pub mod service;

pub use adapters::static_tokens::StaticTokenAuthenticator;
pub use domain::config::{ConfigError, CorsConfig, GatewayConfig, HttpConfig, TimeoutConfig};
pub use domain::error::{ApiError, GatewayError, STORAGE_MESSAGE};
pub use extract::Caller;
pub use ports::outbound::{AuthError, Authenticator};
pub use service::{build_router, ApiGatewayService, AppState, HubServices};
