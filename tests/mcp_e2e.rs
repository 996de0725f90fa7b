//! MCP server end-to-end tests.
//!
//! Drives the JSON-RPC surface against a scripted executor, verifying:
//! - Tool registration and schema shape
//! - Full request/response round trips for every protocol method
//! - Error rendering (faults become `isError` text results, protocol
//!   violations become JSON-RPC errors)

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

mod common;

use common::ScriptedExecutor;
use plainmcp::mcp::{McpServer, ToolRegistry};
use plainmcp::{Error, Result};
use serde_json::{Value, json};
use std::sync::Arc;

const ALL_TOOLS: [&str; 7] = [
    "fetch_threads",
    "search_threads",
    "get_thread_details",
    "update_thread_status",
    "add_thread_note",
    "get_customer_info",
    "analyze_thread_patterns",
];

fn server_with(replies: Vec<Result<Value>>) -> (Arc<ScriptedExecutor>, McpServer<ScriptedExecutor>) {
    let executor = Arc::new(ScriptedExecutor::new(replies));
    let server = McpServer::new(ToolRegistry::new(Arc::clone(&executor)));
    (executor, server)
}

async fn call(server: &McpServer<ScriptedExecutor>, request: &str) -> Value {
    serde_json::from_str(&server.handle_request(request).await).unwrap()
}

mod tool_registry {
    use super::*;

    #[test]
    fn registry_contains_every_support_tool() {
        let registry = ToolRegistry::new(Arc::new(ScriptedExecutor::new(vec![])));

        for name in ALL_TOOLS {
            assert!(registry.get_tool(name).is_some(), "missing tool: {name}");
        }
        assert_eq!(registry.list_tools().len(), ALL_TOOLS.len());
    }

    #[test]
    fn tool_definitions_have_required_fields() {
        let registry = ToolRegistry::new(Arc::new(ScriptedExecutor::new(vec![])));

        for tool in registry.list_tools() {
            assert!(!tool.name.is_empty());
            assert!(!tool.description.is_empty(), "{} has no description", tool.name);
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
            assert!(tool.input_schema["properties"].is_object(), "{}", tool.name);
        }
    }

    #[test]
    fn status_arguments_are_closed_enums() {
        let registry = ToolRegistry::new(Arc::new(ScriptedExecutor::new(vec![])));

        for tool_name in ["fetch_threads", "update_thread_status"] {
            let schema = &registry.get_tool(tool_name).unwrap().input_schema;
            let statuses = schema["properties"]["status"]["enum"].as_array().unwrap();
            assert_eq!(*statuses, vec![json!("TODO"), json!("DONE"), json!("SNOOZED")]);
        }
    }

    #[test]
    fn optional_arguments_declare_defaults() {
        let registry = ToolRegistry::new(Arc::new(ScriptedExecutor::new(vec![])));

        let fetch = &registry.get_tool("fetch_threads").unwrap().input_schema;
        assert_eq!(fetch["properties"]["limit"]["default"], 10);
        assert_eq!(fetch["properties"]["include_resolved"]["default"], false);

        let analyze = &registry.get_tool("analyze_thread_patterns").unwrap().input_schema;
        assert_eq!(analyze["properties"]["days_back"]["default"], 30);
        assert_eq!(analyze["required"], json!(["thread_id"]));
    }
}

mod protocol {
    use super::*;

    #[tokio::test]
    async fn initialize_reports_server_info() {
        let (_, server) = server_with(vec![]);
        let response = call(&server, r#"{"jsonrpc":"2.0","id":1,"method":"initialize"}"#).await;

        assert_eq!(response["jsonrpc"], "2.0");
        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(response["result"]["serverInfo"]["name"], "plainmcp");
        assert!(response["result"]["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn tools_list_returns_all_definitions() {
        let (_, server) = server_with(vec![]);
        let response = call(&server, r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#).await;

        let tools = response["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), ALL_TOOLS.len());
        for tool in tools {
            assert!(tool["inputSchema"]["type"] == "object");
            let name = tool["name"].as_str().unwrap();
            assert!(ALL_TOOLS.contains(&name), "unexpected tool: {name}");
        }
    }

    #[tokio::test]
    async fn ping_answers_with_empty_result() {
        let (_, server) = server_with(vec![]);
        let response = call(&server, r#"{"jsonrpc":"2.0","id":3,"method":"ping"}"#).await;
        assert_eq!(response["result"], json!({}));
    }

    #[tokio::test]
    async fn unknown_method_is_method_not_found() {
        let (_, server) = server_with(vec![]);
        let response =
            call(&server, r#"{"jsonrpc":"2.0","id":4,"method":"prompts/list"}"#).await;

        assert_eq!(response["error"]["code"], -32601);
        assert!(response.get("result").is_none());
    }

    #[tokio::test]
    async fn invalid_json_is_parse_error() {
        let (_, server) = server_with(vec![]);
        let response = call(&server, "{not json").await;
        assert_eq!(response["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn tools_call_without_params_is_invalid_params() {
        let (_, server) = server_with(vec![]);
        let response = call(&server, r#"{"jsonrpc":"2.0","id":5,"method":"tools/call"}"#).await;
        assert_eq!(response["error"]["code"], -32602);
    }
}

mod tool_calls {
    use super::*;

    fn tool_text(response: &Value) -> &str {
        response["result"]["content"][0]["text"].as_str().unwrap()
    }

    #[tokio::test]
    async fn fetch_threads_round_trip() {
        let (executor, server) = server_with(vec![Ok(json!({
            "threads": {
                "edges": [
                    {"node": {"id": "th_1", "title": "Login broken", "status": "TODO"}},
                    {"node": {"id": "th_2", "title": "Billing question", "status": "SNOOZED"}},
                ],
                "pageInfo": {"hasNextPage": false, "endCursor": "c2"}
            }
        }))]);

        let response = call(
            &server,
            r#"{"jsonrpc":"2.0","id":10,"method":"tools/call","params":{"name":"fetch_threads","arguments":{"status":"TODO","limit":2}}}"#,
        )
        .await;

        assert_eq!(response["result"]["isError"], false);
        let payload: Value = serde_json::from_str(tool_text(&response)).unwrap();
        assert_eq!(payload["threads"].as_array().unwrap().len(), 2);
        assert_eq!(payload["hasMore"], false);

        let recorded = executor.call(0);
        assert!(recorded.document.contains("status: TODO"));
        assert!(recorded.document.contains("first: 2"));
    }

    #[tokio::test]
    async fn search_threads_binds_query_as_variable() {
        let (executor, server) = server_with(vec![Ok(json!({
            "searchThreads": {"edges": [{"node": {"thread": {"id": "th_9"}}}]}
        }))]);

        let response = call(
            &server,
            r#"{"jsonrpc":"2.0","id":11,"method":"tools/call","params":{"name":"search_threads","arguments":{"query":"refund \"duplicate charge\""}}}"#,
        )
        .await;

        assert_eq!(response["result"]["isError"], false);
        let payload: Value = serde_json::from_str(tool_text(&response)).unwrap();
        assert_eq!(payload["results"][0]["id"], "th_9");

        let recorded = executor.call(0);
        assert_eq!(recorded.variables["term"], "refund \"duplicate charge\"");
        assert!(!recorded.document.contains("refund"));
    }

    #[tokio::test]
    async fn mutation_business_error_is_data_not_fault() {
        let (_, server) = server_with(vec![Ok(json!({
            "updateThread": {
                "thread": null,
                "error": {"message": "Invalid status", "code": "invalid_input"}
            }
        }))]);

        let response = call(
            &server,
            r#"{"jsonrpc":"2.0","id":12,"method":"tools/call","params":{"name":"update_thread_status","arguments":{"thread_id":"th_1","status":"DONE"}}}"#,
        )
        .await;

        // No fault raised; the error payload is part of the result.
        assert_eq!(response["result"]["isError"], false);
        let payload: Value = serde_json::from_str(tool_text(&response)).unwrap();
        assert_eq!(payload["error"]["message"], "Invalid status");
    }

    #[tokio::test]
    async fn transport_fault_renders_as_error_text() {
        let (_, server) = server_with(vec![Err(Error::Transport(
            "connect error: connection refused".to_string(),
        ))]);

        let response = call(
            &server,
            r#"{"jsonrpc":"2.0","id":13,"method":"tools/call","params":{"name":"fetch_threads","arguments":{}}}"#,
        )
        .await;

        assert_eq!(response["result"]["isError"], true);
        assert!(tool_text(&response).contains("HTTP error"));
    }

    #[tokio::test]
    async fn application_errors_concatenate_in_order() {
        let (_, server) = server_with(vec![Err(Error::Application(
            "bad filter; unknown field; deprecated argument".to_string(),
        ))]);

        let response = call(
            &server,
            r#"{"jsonrpc":"2.0","id":14,"method":"tools/call","params":{"name":"get_customer_info","arguments":{"customer_id":"c_1"}}}"#,
        )
        .await;

        assert_eq!(response["result"]["isError"], true);
        assert_eq!(
            tool_text(&response),
            "GraphQL errors: bad filter; unknown field; deprecated argument"
        );
    }

    #[tokio::test]
    async fn unknown_tool_renders_as_error_text() {
        let (_, server) = server_with(vec![]);

        let response = call(
            &server,
            r#"{"jsonrpc":"2.0","id":15,"method":"tools/call","params":{"name":"delete_everything","arguments":{}}}"#,
        )
        .await;

        assert_eq!(response["result"]["isError"], true);
        assert!(tool_text(&response).contains("unknown tool"));
    }

    #[tokio::test]
    async fn get_thread_details_returns_empty_mapping_for_missing_thread() {
        let (_, server) = server_with(vec![Ok(json!({"thread": null}))]);

        let response = call(
            &server,
            r#"{"jsonrpc":"2.0","id":16,"method":"tools/call","params":{"name":"get_thread_details","arguments":{"thread_id":"th_missing"}}}"#,
        )
        .await;

        assert_eq!(response["result"]["isError"], false);
        let payload: Value = serde_json::from_str(tool_text(&response)).unwrap();
        assert_eq!(payload, json!({}));
    }
}
