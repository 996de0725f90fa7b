//! # Plainmcp
//!
//! MCP server exposing Plain customer-support operations as tools.
//!
//! Each tool call is translated into a single GraphQL operation against the
//! Plain API and the reply is normalized into a flat, JSON-serializable
//! result. The crate is organized as a thin pipeline:
//!
//! - [`api::queries`] builds GraphQL documents from typed arguments
//! - [`api::PlainClient`] posts them and classifies the reply
//! - [`api::normalize`] flattens the paginated edge/node graphs
//! - [`analysis`] composes several calls into the pattern-analysis workflow
//! - [`mcp`] exposes everything as MCP tools over a stdio JSON-RPC server
//!
//! ## Example
//!
//! ```rust,ignore
//! use plainmcp::{PlainClient, PlainConfig, ToolRegistry};
//! use std::sync::Arc;
//!
//! let config = PlainConfig::from_env()?;
//! let client = Arc::new(PlainClient::new(&config)?);
//! let registry = ToolRegistry::new(client);
//! let result = registry
//!     .execute("search_threads", serde_json::json!({"query": "billing"}))
//!     .await?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod analysis;
pub mod api;
pub mod config;
pub mod mcp;
pub mod observability;

// Re-exports for convenience
pub use analysis::{AnalysisStats, PatternOutcome, PatternReport, ThreadSummary};
pub use api::{Document, GraphqlExecutor, Page, PlainClient, ThreadFilter, ThreadStatus};
pub use config::PlainConfig;
pub use mcp::{McpServer, ToolRegistry};

/// Error type for plainmcp operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `Config` | Required credential missing at startup |
/// | `Transport` | Connection refused, timeout, non-2xx status, malformed body |
/// | `Application` | The remote API reported in-band GraphQL errors |
/// | `InvalidInput` | Malformed tool arguments, unknown tool name |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Configuration is missing or invalid.
    ///
    /// Raised when:
    /// - `PLAIN_API_KEY` is not set at startup
    ///
    /// Fatal at initialization, never raised per call.
    #[error("configuration error: {0}")]
    Config(String),

    /// The HTTP transport failed before a GraphQL reply was decoded.
    ///
    /// Raised when:
    /// - The connection is refused or times out
    /// - The server answers with a non-success status
    /// - The response body is not valid JSON
    /// - The client has already been closed
    ///
    /// Never retried automatically.
    #[error("HTTP error: {0}")]
    Transport(String),

    /// The remote API reported one or more errors in-band.
    ///
    /// The message is every reported error message joined by `"; "` in
    /// document order. A reply carrying both `data` and `errors` is treated
    /// as a total failure at this layer.
    #[error("GraphQL errors: {0}")]
    Application(String),

    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - Tool arguments fail to deserialize
    /// - An unknown tool name is called
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The stdio server loop failed to read or write a frame.
    #[error("server i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for plainmcp operations.
pub type Result<T> = std::result::Result<T, Error>;
