//! MCP integration.
//!
//! Exposes the support operations as MCP tools behind a JSON-RPC 2.0
//! stdio server: [`ToolRegistry`] owns the tool definitions and dispatch,
//! [`McpServer`] owns the protocol loop.

mod dispatch;
mod server;
mod tools;

pub use server::McpServer;
pub use tools::{ToolContent, ToolDefinition, ToolRegistry, ToolResult};
