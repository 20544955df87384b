//! Environment-backed secret resolver for local development

use super::traits::{SecretError, SecretResolver};
use async_trait::async_trait;

/// Reads secrets from environment variables.
///
/// A secret named `mongodb-connection-string` is read from
/// `MONGODB_CONNECTION_STRING`.
pub struct EnvSecretResolver;

impl EnvSecretResolver {
    pub fn new() -> Self {
        Self
    }

    /// Environment variable holding the given secret
    pub fn variable_name(secret_name: &str) -> String {
        secret_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect()
    }
}

impl Default for EnvSecretResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretResolver for EnvSecretResolver {
    fn name(&self) -> &str {
        "env"
    }

    async fn resolve(&self, secret_name: &str) -> Result<String, SecretError> {
        match std::env::var(Self::variable_name(secret_name)) {
            Ok(value) if !value.is_empty() => Ok(value),
            _ => Err(SecretError::NotFound(secret_name.to_string())),
        }
    }
}
