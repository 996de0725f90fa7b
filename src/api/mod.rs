//! Plain GraphQL API access.
//!
//! Three layers, each independently testable:
//!
//! - [`queries`] — pure builders turning typed arguments into GraphQL
//!   documents plus their variable sets
//! - [`client`] — the HTTP transport posting `{query, variables}` and
//!   classifying the reply
//! - [`normalize`] — pure functions flattening the paginated edge/node
//!   reply graphs into simple lists and records

pub mod client;
pub mod normalize;
pub mod queries;

pub use client::PlainClient;
pub use normalize::Page;
pub use queries::{Document, ThreadFilter, ThreadStatus};

use crate::Result;
use serde_json::{Map, Value};

/// Trait for GraphQL document execution.
///
/// This is the seam between request construction and the network: the
/// orchestrator and the tool surface only depend on this trait, so tests can
/// substitute a scripted executor for the real [`PlainClient`].
pub trait GraphqlExecutor: Send + Sync {
    /// Executes a document with its variables and returns the `data` payload.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Transport`] on connection-level failures and
    /// [`crate::Error::Application`] when the remote reply carries a
    /// non-empty `errors` collection.
    fn execute(
        &self,
        document: &str,
        variables: &Map<String, Value>,
    ) -> impl Future<Output = Result<Value>> + Send;
}
