//! Domain layer: request status edges, party rules, inputs and errors.

pub mod authorization;
pub mod details;
pub mod errors;
pub mod state_machine;
