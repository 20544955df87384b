//! Google Secret Manager resolver over the REST API

use super::traits::{SecretError, SecretResolver};
use crate::config::SecretSettings;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, error};

#[derive(Debug, Deserialize)]
struct AccessSecretVersionResponse {
    payload: SecretPayload,
}

#[derive(Debug, Deserialize)]
struct SecretPayload {
    #[serde(default)]
    data: String,
}

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
}

/// Resolves secrets from Google Secret Manager.
///
/// Access tokens come from the configured static token when present,
/// otherwise from the instance metadata server.
pub struct GcpSecretManager {
    client: Client,
    project_id: Option<String>,
    endpoint: String,
    metadata_url: String,
    access_token: Option<String>,
}

impl GcpSecretManager {
    /// Create a resolver from secret settings
    pub fn with_settings(settings: &SecretSettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;

        Ok(Self {
            client,
            project_id: settings.project_id.clone(),
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            metadata_url: settings.metadata_url.trim_end_matches('/').to_string(),
            access_token: settings.access_token.clone(),
        })
    }

    /// Full resource name of the latest version of a secret
    pub fn version_name(project_id: &str, secret_name: &str) -> String {
        format!(
            "projects/{}/secrets/{}/versions/latest",
            urlencoding::encode(project_id),
            urlencoding::encode(secret_name)
        )
    }

    async fn token(&self) -> Result<String, SecretError> {
        if let Some(ref token) = self.access_token {
            return Ok(token.clone());
        }

        let url = format!(
            "{}/computeMetadata/v1/instance/service-accounts/default/token",
            self.metadata_url
        );
        let response = self
            .client
            .get(&url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SecretError::Transport(format!(
                "metadata server returned {}",
                response.status()
            )));
        }

        let token: MetadataToken = response.json().await?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl SecretResolver for GcpSecretManager {
    fn name(&self) -> &str {
        "gcp"
    }

    async fn resolve(&self, secret_name: &str) -> Result<String, SecretError> {
        let project_id = self.project_id.as_deref().ok_or_else(|| {
            SecretError::NotConfigured("GOOGLE_CLOUD_PROJECT is not set".to_string())
        })?;

        let token = self.token().await?;
        let url = format!(
            "{}/v1/{}:access",
            self.endpoint,
            Self::version_name(project_id, secret_name)
        );

        debug!("Accessing secret {} in project {}", secret_name, project_id);

        let response = self.client.get(&url).bearer_auth(token).send().await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(SecretError::NotFound(secret_name.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(SecretError::AccessDenied(secret_name.to_string()))
            }
            status => {
                error!("Error accessing secret {}: status {}", secret_name, status);
                return Err(SecretError::Transport(format!(
                    "secret manager returned {}",
                    status
                )));
            }
        }

        let body: AccessSecretVersionResponse = response.json().await?;
        let bytes = STANDARD
            .decode(body.payload.data.as_bytes())
            .map_err(|e| SecretError::InvalidPayload {
                name: secret_name.to_string(),
                reason: e.to_string(),
            })?;
        let value = String::from_utf8(bytes).map_err(|_| SecretError::InvalidPayload {
            name: secret_name.to_string(),
            reason: "payload is not valid UTF-8".to_string(),
        })?;

        if value.is_empty() {
            return Err(SecretError::InvalidPayload {
                name: secret_name.to_string(),
                reason: "payload is empty".to_string(),
            });
        }

        Ok(value)
    }
}
