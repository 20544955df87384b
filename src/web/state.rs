//! Application state shared across handlers

use crate::config::Settings;
use crate::search::MovieSearch;
use crate::secrets::{self, SecretResolver};
use crate::store::{ConnectionManager, MongoConnector, StoreConnector};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Pooled store handle
    pub connections: Arc<ConnectionManager>,
    /// Movie query executor
    pub movies: Arc<MovieSearch>,
}

impl AppState {
    /// Create application state backed by the configured secret store and MongoDB
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let resolver = secrets::from_settings(&settings.secrets)?;
        let connector = Arc::new(MongoConnector::new(settings.mongodb.clone()));
        Ok(Self::with_backends(settings, resolver, connector))
    }

    /// Create application state from explicit backends
    pub fn with_backends(
        settings: Settings,
        resolver: Arc<dyn SecretResolver>,
        connector: Arc<dyn StoreConnector>,
    ) -> Self {
        let connections = Arc::new(
            ConnectionManager::new(resolver, connector, settings.secrets.secret_name.clone())
                .with_reuse(settings.mongodb.reuse_client),
        );
        let movies = Arc::new(MovieSearch::new(connections.clone(), &settings));

        Self {
            settings: Arc::new(settings),
            connections,
            movies,
        }
    }

    /// Service name reported by the health endpoint
    pub fn service_name(&self) -> &str {
        &self.settings.server.service_name
    }
}
