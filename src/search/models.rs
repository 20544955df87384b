//! Request models and validation

use crate::config::SearchSettings;
use crate::secrets::SecretError;
use crate::store::{AcquireError, StoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while serving a movie query
#[derive(Debug, Error)]
pub enum SearchError {
    /// Missing or invalid request field
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Secret(#[from] SecretError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AcquireError> for SearchError {
    fn from(err: AcquireError) -> Self {
        match err {
            AcquireError::Secret(e) => SearchError::Secret(e),
            AcquireError::Store(e) => SearchError::Store(e),
        }
    }
}

/// Free-text search request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Search terms
    #[serde(default)]
    pub query: String,
    /// Maximum number of results
    #[serde(default)]
    pub limit: Option<u32>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Trimmed query terms
    pub fn terms(&self) -> Result<&str, SearchError> {
        let terms = self.query.trim();
        if terms.is_empty() {
            return Err(SearchError::Validation(
                "Query parameter is required".to_string(),
            ));
        }
        Ok(terms)
    }

    /// Requested limit, defaulted and capped by the settings
    pub fn effective_limit(&self, settings: &SearchSettings) -> Result<u32, SearchError> {
        match self.limit.unwrap_or(settings.default_limit) {
            0 => Err(SearchError::Validation(
                "Limit must be at least 1".to_string(),
            )),
            limit => Ok(settings.effective_limit(limit)),
        }
    }
}

/// Exact-title lookup request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TitleLookupRequest {
    #[serde(default)]
    pub title: String,
}

impl TitleLookupRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Trimmed title
    pub fn title(&self) -> Result<&str, SearchError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(SearchError::Validation(
                "Title parameter is required".to_string(),
            ));
        }
        Ok(title)
    }
}
