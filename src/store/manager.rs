//! Process-wide store handle, built from a resolved secret

use super::traits::{MovieStore, StoreConnector, StoreError};
use crate::secrets::{SecretError, SecretResolver};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Failure to obtain a store handle
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error(transparent)]
    Secret(#[from] SecretError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Owns the pooled store handle shared by all requests.
///
/// The connection string is resolved only when a handle has to be built and
/// is dropped as soon as the client exists.
pub struct ConnectionManager {
    resolver: Arc<dyn SecretResolver>,
    connector: Arc<dyn StoreConnector>,
    secret_name: String,
    reuse_client: bool,
    current: RwLock<Option<Arc<dyn MovieStore>>>,
}

impl ConnectionManager {
    pub fn new(
        resolver: Arc<dyn SecretResolver>,
        connector: Arc<dyn StoreConnector>,
        secret_name: impl Into<String>,
    ) -> Self {
        Self {
            resolver,
            connector,
            secret_name: secret_name.into(),
            reuse_client: true,
            current: RwLock::new(None),
        }
    }

    /// Connect on every call instead of caching the handle
    pub fn with_reuse(mut self, reuse_client: bool) -> Self {
        self.reuse_client = reuse_client;
        self
    }

    /// Get a store handle, connecting if none is cached
    pub async fn store(&self) -> Result<Arc<dyn MovieStore>, AcquireError> {
        if !self.reuse_client {
            return self.connect().await;
        }

        if let Some(store) = self.current.read().await.as_ref() {
            return Ok(store.clone());
        }

        let mut current = self.current.write().await;
        if let Some(store) = current.as_ref() {
            return Ok(store.clone());
        }

        let store = self.connect().await?;
        *current = Some(store.clone());
        Ok(store)
    }

    /// Drop the cached handle so the next request re-resolves the secret
    pub async fn invalidate(&self) {
        if self.current.write().await.take().is_some() {
            warn!("Discarded cached MongoDB client");
        }
    }

    /// Re-resolve the secret and swap in a fresh handle.
    ///
    /// On failure the previous handle stays in place.
    pub async fn refresh(&self) -> Result<(), AcquireError> {
        let store = self.connect().await?;
        if self.reuse_client {
            *self.current.write().await = Some(store);
        }
        info!("Refreshed MongoDB client from secret {}", self.secret_name);
        Ok(())
    }

    /// Whether a handle is currently cached
    pub async fn is_connected(&self) -> bool {
        self.current.read().await.is_some()
    }

    async fn connect(&self) -> Result<Arc<dyn MovieStore>, AcquireError> {
        info!(
            "Resolving secret {} via {} backend",
            self.secret_name,
            self.resolver.name()
        );
        let connection_string = self.resolver.resolve(&self.secret_name).await?;
        Ok(self.connector.connect(&connection_string).await?)
    }
}
