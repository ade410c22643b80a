//! Cross-subsystem flows.

mod atomicity;
mod concurrency;
mod http;
mod points;
mod resilience;
mod runtime;
mod scenario;
