//! Ports the gateway depends on.

pub mod outbound;
