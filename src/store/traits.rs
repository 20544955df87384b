//! Document store traits and errors

use async_trait::async_trait;
use mongodb::bson::Document;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by the document store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection string rejected or server unreachable
    #[error("Failed to connect to MongoDB: {0}")]
    Connection(String),

    /// Query failed after a connection was established
    #[error("MongoDB query failed: {0}")]
    Query(String),
}

impl StoreError {
    /// Whether the cached client should be discarded after this error
    pub fn is_connection(&self) -> bool {
        matches!(self, StoreError::Connection(_))
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match *err.kind {
            ErrorKind::Authentication { .. }
            | ErrorKind::ServerSelection { .. }
            | ErrorKind::DnsResolve { .. }
            | ErrorKind::InvalidArgument { .. }
            | ErrorKind::ConnectionPoolCleared { .. }
            | ErrorKind::Io(_) => StoreError::Connection(err.to_string()),
            _ => StoreError::Query(err.to_string()),
        }
    }
}

/// Read-only operations against the movie collection
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Run an aggregation pipeline and collect every document
    async fn aggregate(&self, pipeline: Vec<Document>) -> Result<Vec<Document>, StoreError>;

    /// Return the first document matching a filter
    async fn find_one(
        &self,
        filter: Document,
        projection: Document,
    ) -> Result<Option<Document>, StoreError>;
}

/// Opens store handles from a connection string
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(&self, connection_string: &str) -> Result<Arc<dyn MovieStore>, StoreError>;
}
