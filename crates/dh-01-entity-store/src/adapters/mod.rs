//! Store adapters.

pub mod faults;
pub mod memory;
pub mod retry;
