//! Adapters implementing the gateway's outbound ports.

pub mod static_tokens;
