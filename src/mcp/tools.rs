//! MCP tool implementations.
//!
//! A static registry mapping each tool name and JSON argument schema onto
//! one builder/normalizer pair (or, for `analyze_thread_patterns`, the
//! workflow orchestrator). Arguments arrive as already-validated JSON and
//! are deserialized into typed argument structs; results are rendered as
//! pretty-printed JSON text content.

use crate::analysis;
use crate::api::{GraphqlExecutor, PlainClient, ThreadFilter, ThreadStatus, normalize, queries};
use crate::{Error, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

/// Default page size for listings and searches.
const DEFAULT_LIMIT: u32 = 10;

/// Default lookback window for pattern analysis, in days.
const DEFAULT_DAYS_BACK: u32 = 30;

/// Definition of an MCP tool.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON Schema for input validation.
    pub input_schema: Value,
}

/// Result of a tool execution.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ToolResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the result represents an error.
    pub is_error: bool,
}

impl ToolResult {
    /// Renders a JSON-serializable mapping as pretty-printed text content.
    fn json(value: &Value) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: serde_json::to_string_pretty(value)
                    .unwrap_or_else(|_| "{}".to_string()),
            }],
            is_error: false,
        }
    }
}

/// Content types that can be returned by tools.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Registry of the support tools, bound to a GraphQL executor.
///
/// The executor is injected at construction and shared by every tool call;
/// the registry holds no other state.
pub struct ToolRegistry<E = PlainClient> {
    /// Available tools.
    tools: HashMap<String, ToolDefinition>,
    /// Shared GraphQL executor.
    client: Arc<E>,
}

impl<E: GraphqlExecutor> ToolRegistry<E> {
    /// Creates a registry with all support tools.
    #[must_use]
    pub fn new(client: Arc<E>) -> Self {
        let mut tools = HashMap::new();

        tools.insert(
            "fetch_threads".to_string(),
            ToolDefinition {
                name: "fetch_threads".to_string(),
                description: "Fetch support threads (tickets) with optional filters".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "status": {
                            "type": "string",
                            "enum": ["TODO", "DONE", "SNOOZED"],
                            "description": "Filter by thread status"
                        },
                        "assignee_id": {
                            "type": "string",
                            "description": "Filter by assigned user ID"
                        },
                        "customer_id": {
                            "type": "string",
                            "description": "Filter by customer ID"
                        },
                        "limit": {
                            "type": "integer",
                            "default": 10,
                            "description": "Maximum number of threads to return"
                        },
                        "include_resolved": {
                            "type": "boolean",
                            "default": false,
                            "description": "Include resolved/done threads"
                        }
                    }
                }),
            },
        );

        tools.insert(
            "search_threads".to_string(),
            ToolDefinition {
                name: "search_threads".to_string(),
                description: "Search through support threads using text search".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "Search query for thread content"
                        },
                        "limit": {
                            "type": "integer",
                            "default": 10,
                            "description": "Maximum number of results"
                        }
                    },
                    "required": ["query"]
                }),
            },
        );

        tools.insert(
            "get_thread_details".to_string(),
            ToolDefinition {
                name: "get_thread_details".to_string(),
                description: "Get detailed information about a specific thread including timeline"
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "thread_id": {
                            "type": "string",
                            "description": "Thread ID to get details for"
                        }
                    },
                    "required": ["thread_id"]
                }),
            },
        );

        tools.insert(
            "update_thread_status".to_string(),
            ToolDefinition {
                name: "update_thread_status".to_string(),
                description: "Update the status of a support thread".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "thread_id": {
                            "type": "string",
                            "description": "Thread ID to update"
                        },
                        "status": {
                            "type": "string",
                            "enum": ["TODO", "DONE", "SNOOZED"],
                            "description": "New status for the thread"
                        }
                    },
                    "required": ["thread_id", "status"]
                }),
            },
        );

        tools.insert(
            "add_thread_note".to_string(),
            ToolDefinition {
                name: "add_thread_note".to_string(),
                description: "Add a note to a support thread".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "thread_id": {
                            "type": "string",
                            "description": "Thread ID to add note to"
                        },
                        "content": {
                            "type": "string",
                            "description": "Note content"
                        }
                    },
                    "required": ["thread_id", "content"]
                }),
            },
        );

        tools.insert(
            "get_customer_info".to_string(),
            ToolDefinition {
                name: "get_customer_info".to_string(),
                description: "Get detailed information about a customer".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "customer_id": {
                            "type": "string",
                            "description": "Customer ID to get info for"
                        }
                    },
                    "required": ["customer_id"]
                }),
            },
        );

        tools.insert(
            "analyze_thread_patterns".to_string(),
            ToolDefinition {
                name: "analyze_thread_patterns".to_string(),
                description: "Analyze patterns in threads to find similar issues".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "thread_id": {
                            "type": "string",
                            "description": "Reference thread ID to find similar issues"
                        },
                        "days_back": {
                            "type": "integer",
                            "default": 30,
                            "description": "Number of days to look back"
                        }
                    },
                    "required": ["thread_id"]
                }),
            },
        );

        Self { tools, client }
    }

    /// Returns all tool definitions.
    #[must_use]
    pub fn list_tools(&self) -> Vec<&ToolDefinition> {
        self.tools.values().collect()
    }

    /// Gets a tool definition by name.
    #[must_use]
    pub fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// Executes a tool with the given arguments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for unknown tools or malformed
    /// arguments; transport and application errors from the underlying
    /// client propagate unchanged.
    pub async fn execute(&self, name: &str, arguments: Value) -> Result<ToolResult> {
        let result = match name {
            "fetch_threads" => self.fetch_threads(parse_args(arguments)?).await?,
            "search_threads" => self.search_threads(parse_args(arguments)?).await?,
            "get_thread_details" => self.get_thread_details(parse_args(arguments)?).await?,
            "update_thread_status" => self.update_thread_status(parse_args(arguments)?).await?,
            "add_thread_note" => self.add_thread_note(parse_args(arguments)?).await?,
            "get_customer_info" => self.get_customer_info(parse_args(arguments)?).await?,
            "analyze_thread_patterns" => {
                self.analyze_thread_patterns(parse_args(arguments)?).await?
            },
            _ => return Err(Error::InvalidInput(format!("unknown tool: {name}"))),
        };

        Ok(ToolResult::json(&result))
    }

    async fn fetch_threads(&self, args: FetchThreadsArgs) -> Result<Value> {
        let filter = ThreadFilter {
            status: args.status,
            assignee_id: args.assignee_id,
            customer_id: args.customer_id,
            include_resolved: args.include_resolved,
        };
        let document = queries::threads_query(&filter, args.limit);
        let data = self.client.execute(&document.text, &document.variables).await?;
        let page = normalize::edge_nodes(&data, "threads");

        Ok(json!({
            "threads": page.items,
            "hasMore": page.has_more,
        }))
    }

    async fn search_threads(&self, args: SearchThreadsArgs) -> Result<Value> {
        let document = queries::search_threads_query(&args.query, args.limit);
        let data = self.client.execute(&document.text, &document.variables).await?;
        let page = normalize::search_results(&data);

        Ok(json!({
            "results": page.items,
            "hasMore": page.has_more,
        }))
    }

    async fn get_thread_details(&self, args: ThreadIdArgs) -> Result<Value> {
        let document = queries::thread_details_query(&args.thread_id);
        let data = self.client.execute(&document.text, &document.variables).await?;
        Ok(normalize::singleton(&data, "thread"))
    }

    async fn update_thread_status(&self, args: UpdateStatusArgs) -> Result<Value> {
        let document = queries::update_thread_status_mutation(&args.thread_id, args.status);
        let data = self.client.execute(&document.text, &document.variables).await?;
        Ok(normalize::mutation_result(&data, "updateThread"))
    }

    async fn add_thread_note(&self, args: AddNoteArgs) -> Result<Value> {
        let document = queries::create_thread_note_mutation(&args.thread_id, &args.content);
        let data = self.client.execute(&document.text, &document.variables).await?;
        Ok(normalize::mutation_result(&data, "createThreadNote"))
    }

    async fn get_customer_info(&self, args: CustomerArgs) -> Result<Value> {
        let document = queries::customer_query(&args.customer_id);
        let data = self.client.execute(&document.text, &document.variables).await?;
        Ok(normalize::singleton(&data, "customer"))
    }

    async fn analyze_thread_patterns(&self, args: AnalyzeArgs) -> Result<Value> {
        let outcome = analysis::analyze_thread_patterns(
            self.client.as_ref(),
            &args.thread_id,
            args.days_back,
        )
        .await?;
        serde_json::to_value(&outcome)
            .map_err(|e| Error::InvalidInput(format!("unserializable analysis result: {e}")))
    }
}

fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    serde_json::from_value(arguments).map_err(|e| Error::InvalidInput(e.to_string()))
}

const fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

const fn default_days_back() -> u32 {
    DEFAULT_DAYS_BACK
}

/// Arguments for the thread listing tool.
#[derive(Debug, Deserialize)]
struct FetchThreadsArgs {
    status: Option<ThreadStatus>,
    assignee_id: Option<String>,
    customer_id: Option<String>,
    #[serde(default = "default_limit")]
    limit: u32,
    #[serde(default)]
    include_resolved: bool,
}

/// Arguments for the search tool.
#[derive(Debug, Deserialize)]
struct SearchThreadsArgs {
    query: String,
    #[serde(default = "default_limit")]
    limit: u32,
}

/// Arguments for tools taking only a thread id.
#[derive(Debug, Deserialize)]
struct ThreadIdArgs {
    thread_id: String,
}

/// Arguments for the status-update tool.
#[derive(Debug, Deserialize)]
struct UpdateStatusArgs {
    thread_id: String,
    status: ThreadStatus,
}

/// Arguments for the note tool.
#[derive(Debug, Deserialize)]
struct AddNoteArgs {
    thread_id: String,
    content: String,
}

/// Arguments for the customer tool.
#[derive(Debug, Deserialize)]
struct CustomerArgs {
    customer_id: String,
}

/// Arguments for the pattern-analysis tool.
#[derive(Debug, Deserialize)]
struct AnalyzeArgs {
    thread_id: String,
    #[serde(default = "default_days_back")]
    days_back: u32,
}
