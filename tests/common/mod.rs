//! Shared test support: a scripted GraphQL executor.

#![allow(dead_code)]

use plainmcp::api::GraphqlExecutor;
use plainmcp::{Error, Result};
use serde_json::{Map, Value};
use std::sync::Mutex;

/// One recorded call to the executor.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// The document text that was executed.
    pub document: String,
    /// The variables the document referenced.
    pub variables: Map<String, Value>,
}

/// Executor that pops canned replies in order and records every call.
///
/// Stands in for the remote API: no test in this suite touches the network.
pub struct ScriptedExecutor {
    replies: Mutex<Vec<Result<Value>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedExecutor {
    /// Creates an executor that will answer with `replies`, in order.
    pub fn new(replies: Vec<Result<Value>>) -> Self {
        Self {
            replies: Mutex::new(replies),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Number of calls issued so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The nth recorded call.
    pub fn call(&self, index: usize) -> RecordedCall {
        self.calls.lock().unwrap()[index].clone()
    }
}

impl GraphqlExecutor for ScriptedExecutor {
    async fn execute(&self, document: &str, variables: &Map<String, Value>) -> Result<Value> {
        self.calls.lock().unwrap().push(RecordedCall {
            document: document.to_string(),
            variables: variables.clone(),
        });

        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(Error::Application("no scripted reply left".to_string()));
        }
        replies.remove(0)
    }
}
