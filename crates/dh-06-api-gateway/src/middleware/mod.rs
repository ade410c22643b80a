//! Middleware stack for the API Gateway.
//!
//! Layer order: Request → Tracing → Timeout → CORS → Router → Handler
//!
//! Authentication is not a layer: handlers that need a caller take the
//! [`Caller`](crate::extract::Caller) extractor, so public routes stay public.

pub mod auth;
pub mod cors;
pub mod timeout;
pub mod tracing;

pub use auth::{constant_time_compare, extract_bearer_token};
pub use cors::create_cors_layer;
pub use timeout::TimeoutLayer;
pub use tracing::{TracingLayer, REQUEST_ID_HEADER};
