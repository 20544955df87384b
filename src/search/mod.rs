//! Movie search module
//!
//! Validates requests, builds queries, executes them against the shared
//! store handle and shapes the results.

mod executor;
mod models;

pub use executor::MovieSearch;
pub use models::*;
