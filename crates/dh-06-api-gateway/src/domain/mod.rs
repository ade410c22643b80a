//! Gateway domain: configuration and the error envelope.

pub mod config;
pub mod error;
