//! Configuration management.
//!
//! Configuration is environment-first: the binary loads `.env` via `dotenvy`
//! and then reads `PLAIN_API_KEY`, `PLAIN_API_URL`, and `PLAIN_WORKSPACE_ID`.
//! The API key is required and its absence is a startup fault, never a
//! per-call fault.

use crate::{Error, Result};
use secrecy::SecretString;

/// Environment variable holding the required API key.
pub const API_KEY_VAR: &str = "PLAIN_API_KEY";

/// Environment variable overriding the GraphQL endpoint.
pub const API_URL_VAR: &str = "PLAIN_API_URL";

/// Environment variable holding the optional workspace id.
pub const WORKSPACE_ID_VAR: &str = "PLAIN_WORKSPACE_ID";

/// Configuration for the Plain GraphQL API.
#[derive(Debug, Clone)]
pub struct PlainConfig {
    /// API key sent as a bearer credential.
    pub api_key: SecretString,
    /// GraphQL endpoint URL.
    pub base_url: String,
    /// Workspace id, if the account requires one.
    pub workspace_id: Option<String>,
}

impl PlainConfig {
    /// Default GraphQL endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "https://core-api.uk.plain.com/graphql/v1";

    /// Creates a configuration from an API key, with the default endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: Self::DEFAULT_ENDPOINT.to_string(),
            workspace_id: None,
        }
    }

    /// Loads configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `PLAIN_API_KEY` is not set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_VAR).map_err(|_| {
            Error::Config(format!("{API_KEY_VAR} environment variable is required"))
        })?;

        let mut config = Self::new(api_key);
        if let Ok(url) = std::env::var(API_URL_VAR) {
            config.base_url = url;
        }
        if let Ok(workspace_id) = std::env::var(WORKSPACE_ID_VAR) {
            config.workspace_id = Some(workspace_id);
        }

        Ok(config)
    }

    /// Sets the endpoint URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the workspace id.
    #[must_use]
    pub fn with_workspace_id(mut self, id: impl Into<String>) -> Self {
        self.workspace_id = Some(id.into());
        self
    }
}
