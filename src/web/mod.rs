//! Web server module
//!
//! Provides the HTTP API for movie search.

mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use handlers::{MovieResponse, SearchResponse};
pub use routes::create_router;
pub use state::AppState;
