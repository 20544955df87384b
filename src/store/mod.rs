//! Document store access
//!
//! Builds MongoDB handles from a resolved connection string and shares
//! one pooled client across requests.

mod manager;
mod mongo;
mod traits;

pub use manager::{AcquireError, ConnectionManager};
pub use mongo::{MongoConnector, MongoStore};
pub use traits::{MovieStore, StoreConnector, StoreError};
