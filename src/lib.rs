//! Movie search API
//!
//! Translates natural-language and exact-title movie queries into MongoDB
//! Atlas Search requests, using a connection string held in a secret store.

pub mod config;
pub mod query;
pub mod results;
pub mod search;
pub mod secrets;
pub mod store;
pub mod web;

#[cfg(test)]
mod testing;

pub use config::Settings;
pub use results::MovieRecord;
pub use search::{MovieSearch, SearchRequest, TitleLookupRequest};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
