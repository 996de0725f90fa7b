//! MCP server setup and lifecycle.
//!
//! Implements a JSON-RPC 2.0 MCP server over stdio: line-delimited requests
//! on stdin, one response line per request on stdout. Logs go strictly to
//! stderr; stdout carries only protocol frames.

use super::dispatch::McpMethod;
use super::tools::ToolRegistry;
use crate::api::{GraphqlExecutor, PlainClient};
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{Instrument, info_span};

/// MCP protocol version.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server name.
const SERVER_NAME: &str = "plainmcp";

/// MCP server bound to a tool registry.
pub struct McpServer<E = PlainClient> {
    /// Tool registry.
    tools: ToolRegistry<E>,
}

impl<E: GraphqlExecutor> McpServer<E> {
    /// Creates a server over the given registry.
    #[must_use]
    pub const fn new(tools: ToolRegistry<E>) -> Self {
        Self { tools }
    }

    /// Serves requests from stdin until it closes.
    ///
    /// # Errors
    ///
    /// Returns an error if stdin or stdout fails.
    pub async fn run_stdio(&self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        tracing::info!(server = SERVER_NAME, "MCP server listening on stdio");

        while let Some(line) = lines.next_line().await? {
            if line.is_empty() {
                continue;
            }

            let response = self.handle_request(&line).await;
            stdout.write_all(response.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }

        Ok(())
    }

    /// Handles a single JSON-RPC request line and returns the response line.
    pub async fn handle_request(&self, request: &str) -> String {
        let start = Instant::now();

        let parsed: std::result::Result<JsonRpcRequest, _> = serde_json::from_str(request);
        let mut method_label = "parse_error".to_string();
        let status_label;

        let response = match parsed {
            Ok(req) => {
                method_label.clone_from(&req.method);
                let span = info_span!(
                    "mcp.request",
                    rpc.method = method_label.as_str(),
                    rpc.id = tracing::field::Empty,
                );
                if let Some(id) = &req.id {
                    span.record("rpc.id", id.to_string().as_str());
                }
                tracing::info!(parent: &span, method = %method_label, "Processing MCP request");

                let result = self
                    .dispatch_method(&req.method, req.params)
                    .instrument(span)
                    .await;
                status_label = if result.is_ok() { "success" } else { "error" };
                format_response(req.id, result)
            },
            Err(e) => {
                status_label = "parse_error";
                format_error(None, -32700, &format!("Parse error: {e}"))
            },
        };

        metrics::counter!(
            "mcp_requests_total",
            "method" => method_label.clone(),
            "status" => status_label
        )
        .increment(1);
        metrics::histogram!(
            "mcp_request_duration_ms",
            "method" => method_label
        )
        .record(start.elapsed().as_secs_f64() * 1000.0);

        response
    }

    /// Dispatches a method call through the [`McpMethod`] command enum.
    async fn dispatch_method(&self, method: &str, params: Option<Value>) -> DispatchResult {
        match McpMethod::from(method) {
            McpMethod::Initialize => Ok(initialize_result()),
            McpMethod::ListTools => Ok(self.list_tools_result()),
            McpMethod::CallTool => self.handle_call_tool(params).await,
            McpMethod::Ping => Ok(serde_json::json!({})),
            McpMethod::Unknown(name) => Err((-32601, format!("Method not found: {name}"))),
        }
    }

    /// Handles tools/list.
    fn list_tools_result(&self) -> Value {
        let tools: Vec<Value> = self
            .tools
            .list_tools()
            .iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect();

        serde_json::json!({ "tools": tools })
    }

    /// Handles tools/call.
    ///
    /// A fault raised by a tool is rendered as an `isError` text result
    /// rather than a JSON-RPC error, so the calling assistant sees the
    /// message.
    async fn handle_call_tool(&self, params: Option<Value>) -> DispatchResult {
        let params = params.ok_or((-32602, "Missing params".to_string()))?;

        let name = params
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or((-32602, "Missing tool name".to_string()))?;
        let tool_name = name.to_string();

        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or(serde_json::json!({}));

        let start = Instant::now();
        let span = info_span!("mcp.tool.call", tool.name = tool_name.as_str());
        let outcome = self
            .tools
            .execute(name, arguments)
            .instrument(span)
            .await;

        let (result, status_label) = match outcome {
            Ok(result) => (
                serde_json::json!({
                    "content": result.content,
                    "isError": result.is_error
                }),
                if result.is_error { "error" } else { "success" },
            ),
            Err(e) => (
                serde_json::json!({
                    "content": [{ "type": "text", "text": e.to_string() }],
                    "isError": true
                }),
                "error",
            ),
        };

        metrics::counter!(
            "mcp_tool_calls_total",
            "tool" => tool_name.clone(),
            "status" => status_label
        )
        .increment(1);
        metrics::histogram!(
            "mcp_tool_duration_ms",
            "tool" => tool_name
        )
        .record(start.elapsed().as_secs_f64() * 1000.0);

        Ok(result)
    }
}

/// Handles initialize.
fn initialize_result() -> Value {
    serde_json::json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

/// Formats a successful response.
fn format_response(id: Option<Value>, result: DispatchResult) -> String {
    match result {
        Ok(value) => {
            let response = JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id,
                result: Some(value),
                error: None,
            };
            serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string())
        },
        Err((code, message)) => format_error(id, code, &message),
    }
}

/// Formats an error response.
fn format_error(id: Option<Value>, code: i32, message: &str) -> String {
    let response = JsonRpcResponse {
        jsonrpc: "2.0".to_string(),
        id,
        result: None,
        error: Some(JsonRpcError {
            code,
            message: message.to_string(),
        }),
    };
    serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string())
}

/// Result type for method dispatch.
type DispatchResult = std::result::Result<Value, (i32, String)>;

/// JSON-RPC request.
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    /// JSON-RPC version (required by protocol but not used in code).
    #[serde(rename = "jsonrpc")]
    _jsonrpc: String,
    id: Option<Value>,
    method: String,
    params: Option<Value>,
}

/// JSON-RPC response.
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC error.
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}
