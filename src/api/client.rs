//! Plain GraphQL transport client.
//!
//! Owns one long-lived authenticated HTTP connection for its lifetime.
//! Every call posts a `{query, variables}` envelope and classifies the
//! reply as a transport failure, an application-level (GraphQL) error, or a
//! success payload. Nothing is retried and nothing is cached.

use super::GraphqlExecutor;
use crate::config::PlainConfig;
use crate::{Error, Result};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Fixed timeout applied to every individual network call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Plain GraphQL API.
///
/// Create once at startup and thread a shared reference into every
/// operation; call [`PlainClient::close`] exactly once on shutdown. The
/// client is safe for concurrent use.
pub struct PlainClient {
    /// Underlying HTTP client with auth headers and connection pooling.
    http: reqwest::Client,
    /// GraphQL endpoint.
    base_url: String,
    /// Set once by [`PlainClient::close`]; calls fail afterwards.
    closed: AtomicBool,
}

impl PlainClient {
    /// Creates a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the API key cannot be carried in an
    /// HTTP header or the HTTP client cannot be constructed.
    pub fn new(config: &PlainConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth =
            HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose_secret()))
                .map_err(|e| Error::Config(format!("API key is not header-safe: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            closed: AtomicBool::new(false),
        })
    }

    /// Releases the client.
    ///
    /// Safe to call at most once per shutdown path and a no-op when already
    /// closed. Subsequent calls to [`GraphqlExecutor::execute`] fail with a
    /// transport error.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::info!("Plain client closed");
        }
    }

    /// Whether [`PlainClient::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    async fn post(&self, document: &str, variables: &Map<String, Value>) -> Result<Value> {
        if self.is_closed() {
            return Err(Error::Transport("client is closed".to_string()));
        }

        let payload = serde_json::json!({
            "query": document,
            "variables": variables,
        });

        let response = self
            .http
            .post(&self.base_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let error_kind = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connect"
                } else if e.is_request() {
                    "request"
                } else {
                    "unknown"
                };
                tracing::error!(
                    error = %e,
                    error_kind = error_kind,
                    "GraphQL request failed"
                );
                Error::Transport(format!("{error_kind} error: {e}"))
            })?;

        let response = response.error_for_status().map_err(|e| {
            tracing::error!(error = %e, "GraphQL endpoint returned error status");
            Error::Transport(e.to_string())
        })?;

        let body: Value = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to decode GraphQL response body");
            Error::Transport(format!("malformed response body: {e}"))
        })?;

        into_data(body)
    }
}

impl GraphqlExecutor for PlainClient {
    async fn execute(&self, document: &str, variables: &Map<String, Value>) -> Result<Value> {
        self.post(document, variables).await
    }
}

/// Splits a decoded reply into its `data` payload or an application error.
///
/// A non-empty `errors` collection is a total failure even when the body
/// also carries a `data` section. Messages are joined with `"; "` in
/// document order; an error entry without a `message` field is reported as
/// its raw JSON.
fn into_data(body: Value) -> Result<Value> {
    if let Some(errors) = body.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            let joined = errors
                .iter()
                .map(|error| {
                    error
                        .get("message")
                        .and_then(Value::as_str)
                        .map_or_else(|| error.to_string(), ToString::to_string)
                })
                .collect::<Vec<_>>()
                .join("; ");
            return Err(Error::Application(joined));
        }
    }

    Ok(body
        .get("data")
        .filter(|data| !data.is_null())
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new())))
}
