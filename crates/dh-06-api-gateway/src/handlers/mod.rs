//! Route handlers, one module per resource.

pub mod donations;
pub mod system;
pub mod users;
pub mod volunteers;
