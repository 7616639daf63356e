//! CLI command implementations.

pub mod coverage;
pub mod resolve;
pub mod store;
