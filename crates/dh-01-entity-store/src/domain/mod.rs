pub mod batch;
pub mod errors;
pub mod query;
