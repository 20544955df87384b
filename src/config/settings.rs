//! Settings structures for the movie search API

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main settings structure, loadable from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub secrets: SecretSettings,
    pub mongodb: MongoSettings,
    pub search: SearchSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables
    pub fn merge_env(&mut self) {
        self.merge_from(|key| std::env::var(key).ok());
    }

    /// Merge overrides from an arbitrary variable lookup
    pub fn merge_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("MOVIES_API_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = lookup("GOOGLE_CLOUD_PROJECT") {
            if !val.is_empty() {
                self.secrets.project_id = Some(val);
            }
        }
        if let Some(val) = lookup("MOVIES_API_SECRET_BACKEND") {
            match val.to_lowercase().as_str() {
                "gcp" => self.secrets.backend = SecretBackend::Gcp,
                "env" => self.secrets.backend = SecretBackend::Env,
                other => tracing::warn!("Ignoring unknown secret backend: {}", other),
            }
        }
        if let Some(val) = lookup("GOOGLE_OAUTH_ACCESS_TOKEN") {
            if !val.is_empty() {
                self.secrets.access_token = Some(val);
            }
        }
        if let Some(val) = lookup("MOVIES_API_DATABASE") {
            self.mongodb.database = val;
        }
        if let Some(val) = lookup("MOVIES_API_COLLECTION") {
            self.mongodb.collection = val;
        }
        if let Some(val) = lookup("MOVIES_API_SEARCH_INDEX") {
            self.mongodb.search_index = val;
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// Service name reported by the health endpoint
    pub service_name: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: "0.0.0.0".to_string(),
            service_name: "mongodb-vertex-api".to_string(),
        }
    }
}

/// Where secrets are resolved from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretBackend {
    /// Google Secret Manager
    #[default]
    Gcp,
    /// Process environment (local development)
    Env,
}

/// Secret store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretSettings {
    /// Secret backend
    pub backend: SecretBackend,
    /// Cloud project that owns the secrets
    pub project_id: Option<String>,
    /// Name of the secret holding the MongoDB connection string
    pub secret_name: String,
    /// Secret Manager API base URL
    pub endpoint: String,
    /// Metadata server base URL used to mint access tokens
    pub metadata_url: String,
    /// Static OAuth access token (skips the metadata server)
    pub access_token: Option<String>,
    /// Timeout for secret store requests in seconds
    pub request_timeout_secs: u64,
}

impl Default for SecretSettings {
    fn default() -> Self {
        Self {
            backend: SecretBackend::Gcp,
            project_id: None,
            secret_name: "mongodb-connection-string".to_string(),
            endpoint: "https://secretmanager.googleapis.com".to_string(),
            metadata_url: "http://metadata.google.internal".to_string(),
            access_token: None,
            request_timeout_secs: 10,
        }
    }
}

impl SecretSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// How the title lookup interprets the caller's input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleMatch {
    /// Escaped, case-insensitive substring match
    #[default]
    Literal,
    /// Raw regular expression, case-insensitive
    Pattern,
}

/// MongoDB topology and client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoSettings {
    /// Database name
    pub database: String,
    /// Collection name
    pub collection: String,
    /// Atlas Search index name
    pub search_index: String,
    /// Application name reported to the server
    pub app_name: String,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Server selection timeout in seconds
    pub server_selection_timeout_secs: u64,
    /// Per-operation timeout in seconds
    pub query_timeout_secs: u64,
    /// Keep one pooled client for the process instead of connecting per request
    pub reuse_client: bool,
    /// Title lookup matching mode
    pub title_match: TitleMatch,
}

impl Default for MongoSettings {
    fn default() -> Self {
        Self {
            database: "sample_mflix".to_string(),
            collection: "movies".to_string(),
            search_index: "movies_search_index".to_string(),
            app_name: "movie-search-api".to_string(),
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 10,
            query_timeout_secs: 30,
            reuse_client: true,
            title_match: TitleMatch::Literal,
        }
    }
}

impl MongoSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn server_selection_timeout(&self) -> Duration {
        Duration::from_secs(self.server_selection_timeout_secs)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

/// Search request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Limit applied when the request omits one
    pub default_limit: u32,
    /// Optional cap on the requested limit
    pub max_limit: Option<u32>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: None,
        }
    }
}

impl SearchSettings {
    /// Apply the configured cap to a requested limit
    pub fn effective_limit(&self, requested: u32) -> u32 {
        match self.max_limit {
            Some(max) => requested.min(max),
            None => requested,
        }
    }
}
