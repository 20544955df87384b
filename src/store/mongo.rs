//! MongoDB-backed movie store

use super::traits::{MovieStore, StoreConnector, StoreError};
use crate::config::MongoSettings;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::ClientOptions,
    Client, Collection,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Handle to the configured movie collection
pub struct MongoStore {
    collection: Collection<Document>,
    query_timeout: Duration,
}

impl MongoStore {
    pub fn new(client: &Client, settings: &MongoSettings) -> Self {
        let collection = client
            .database(&settings.database)
            .collection::<Document>(&settings.collection);

        Self {
            collection,
            query_timeout: settings.query_timeout(),
        }
    }
}

#[async_trait]
impl MovieStore for MongoStore {
    async fn aggregate(&self, pipeline: Vec<Document>) -> Result<Vec<Document>, StoreError> {
        let cursor = self
            .collection
            .aggregate(pipeline)
            .max_time(self.query_timeout)
            .await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        debug!(
            "Aggregation on {} returned {} documents",
            self.collection.namespace(),
            documents.len()
        );
        Ok(documents)
    }

    async fn find_one(
        &self,
        filter: Document,
        projection: Document,
    ) -> Result<Option<Document>, StoreError> {
        let document = self
            .collection
            .find_one(filter)
            .projection(projection)
            .max_time(self.query_timeout)
            .await?;
        Ok(document)
    }
}

/// Connects to MongoDB using the configured topology and timeouts
pub struct MongoConnector {
    settings: MongoSettings,
}

impl MongoConnector {
    pub fn new(settings: MongoSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl StoreConnector for MongoConnector {
    async fn connect(&self, connection_string: &str) -> Result<Arc<dyn MovieStore>, StoreError> {
        // The driver error for a bad URI echoes it back, credentials included.
        let mut options = ClientOptions::parse(connection_string)
            .await
            .map_err(|_| StoreError::Connection("invalid connection string".to_string()))?;

        options.app_name = Some(self.settings.app_name.clone());
        options.connect_timeout = Some(self.settings.connect_timeout());
        options.server_selection_timeout = Some(self.settings.server_selection_timeout());

        let client = Client::with_options(options)
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        // Ping to verify connection
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        info!(
            "Connected to MongoDB, using {}.{}",
            self.settings.database, self.settings.collection
        );

        Ok(Arc::new(MongoStore::new(&client, &self.settings)))
    }
}
