//! Secret resolution
//!
//! Resolves the MongoDB connection string from a secret store at runtime.

mod env;
mod gcp;
mod traits;

pub use env::EnvSecretResolver;
pub use gcp::GcpSecretManager;
pub use traits::{SecretError, SecretResolver};

use crate::config::{SecretBackend, SecretSettings};
use std::sync::Arc;

/// Build the resolver selected by the settings
pub fn from_settings(settings: &SecretSettings) -> anyhow::Result<Arc<dyn SecretResolver>> {
    let resolver: Arc<dyn SecretResolver> = match settings.backend {
        SecretBackend::Gcp => Arc::new(GcpSecretManager::with_settings(settings)?),
        SecretBackend::Env => Arc::new(EnvSecretResolver::new()),
    };
    Ok(resolver)
}
