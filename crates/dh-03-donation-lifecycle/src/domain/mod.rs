//! Domain layer: status edges, creation rules and errors.

pub mod errors;
pub mod filter;
pub mod new_donation;
pub mod state_machine;
