//! Secret resolver trait and errors

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while resolving a secret
#[derive(Debug, Error)]
pub enum SecretError {
    /// Backend is missing required configuration
    #[error("Secret store is not configured: {0}")]
    NotConfigured(String),

    /// Secret (or its latest version) does not exist
    #[error("Secret {0} not found")]
    NotFound(String),

    /// Caller lacks permission to read the secret
    #[error("Access to secret {0} denied")]
    AccessDenied(String),

    /// Secret payload could not be decoded
    #[error("Secret {name} has an invalid payload: {reason}")]
    InvalidPayload { name: String, reason: String },

    /// Network or protocol failure talking to the secret store
    #[error("Secret store request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for SecretError {
    fn from(err: reqwest::Error) -> Self {
        SecretError::Transport(err.without_url().to_string())
    }
}

/// Resolves named secrets to their current value
#[async_trait]
pub trait SecretResolver: Send + Sync {
    /// Backend name, for logging
    fn name(&self) -> &str;

    /// Fetch the latest value of a secret
    async fn resolve(&self, secret_name: &str) -> Result<String, SecretError>;
}
