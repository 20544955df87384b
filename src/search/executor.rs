//! Movie query execution

use super::models::{SearchError, SearchRequest, TitleLookupRequest};
use crate::config::{MongoSettings, SearchSettings, Settings};
use crate::query::{build_search_pipeline, build_title_filter, title_projection};
use crate::results::MovieRecord;
use crate::store::{ConnectionManager, StoreError};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Runs validated movie queries against the shared store handle
pub struct MovieSearch {
    connections: Arc<ConnectionManager>,
    mongo: MongoSettings,
    search: SearchSettings,
}

impl MovieSearch {
    pub fn new(connections: Arc<ConnectionManager>, settings: &Settings) -> Self {
        Self {
            connections,
            mongo: settings.mongodb.clone(),
            search: settings.search.clone(),
        }
    }

    /// Full-text search; an empty result list is not an error
    pub async fn find_movies(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<MovieRecord>, SearchError> {
        let terms = request.terms()?;
        let limit = request.effective_limit(&self.search)?;
        let pipeline = build_search_pipeline(terms, limit, &self.mongo.search_index);

        let start = Instant::now();
        let store = self.connections.store().await?;
        let documents = self.checked(store.aggregate(pipeline).await).await?;

        info!(
            "Search '{}' returned {} movies in {:?}",
            terms,
            documents.len(),
            start.elapsed()
        );

        Ok(documents.into_iter().map(MovieRecord::from_document).collect())
    }

    /// First movie whose title matches, case-insensitively
    pub async fn find_by_title(
        &self,
        request: &TitleLookupRequest,
    ) -> Result<Option<MovieRecord>, SearchError> {
        let title = request.title()?;
        let filter = build_title_filter(title, self.mongo.title_match);

        let store = self.connections.store().await?;
        let document = self
            .checked(store.find_one(filter, title_projection()).await)
            .await?;

        debug!("Title lookup '{}' found: {}", title, document.is_some());

        Ok(document.map(MovieRecord::from_document))
    }

    /// Drop the cached client when the store reports a connection failure
    async fn checked<T>(&self, result: Result<T, StoreError>) -> Result<T, StoreError> {
        if let Err(ref e) = result {
            if e.is_connection() {
                self.connections.invalidate().await;
            }
        }
        result
    }
}
