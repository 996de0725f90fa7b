//! GraphQL document builders.
//!
//! Each builder is a pure function from typed arguments to a [`Document`]:
//! the query/mutation text plus the variable set it references.
//!
//! Caller-supplied free strings (ids, search terms, note text) are never
//! spliced into the document text; they travel through the `variables`
//! channel as `ID!`/`String!` values. Only validated [`ThreadStatus`]
//! literals and integer bounds are rendered inline.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Timeline entries requested by the thread-detail query.
const TIMELINE_PAGE_SIZE: u32 = 20;

/// Tenant memberships requested by the customer query.
const MEMBERSHIP_PAGE_SIZE: u32 = 5;

/// A GraphQL document together with the variables it references.
#[derive(Debug, Clone)]
pub struct Document {
    /// Query or mutation text.
    pub text: String,
    /// Variable values, keyed by variable name without the `$` sigil.
    pub variables: Map<String, Value>,
}

impl Document {
    fn new(text: String) -> Self {
        Self {
            text,
            variables: Map::new(),
        }
    }
}

/// Thread status as the remote API spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThreadStatus {
    /// Open, needs attention.
    Todo,
    /// Resolved.
    Done,
    /// Parked until a later time.
    Snoozed,
}

impl ThreadStatus {
    /// The wire literal for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::Done => "DONE",
            Self::Snoozed => "SNOOZED",
        }
    }
}

impl fmt::Display for ThreadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThreadStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TODO" => Ok(Self::Todo),
            "DONE" => Ok(Self::Done),
            "SNOOZED" => Ok(Self::Snoozed),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown thread status: {other}"
            ))),
        }
    }
}

/// Optional predicates for the thread listing query.
///
/// Predicates combine with AND semantics into one filter object. When
/// `include_resolved` is false, an implicit open/snoozed predicate is
/// appended after any explicit status clause so that default listings never
/// surface resolved threads; both clauses may legally be present at once.
#[derive(Debug, Clone, Default)]
pub struct ThreadFilter {
    /// Explicit status predicate.
    pub status: Option<ThreadStatus>,
    /// Restrict to threads assigned to this user.
    pub assignee_id: Option<String>,
    /// Restrict to threads opened by this customer.
    pub customer_id: Option<String>,
    /// When false, resolved threads are filtered out.
    pub include_resolved: bool,
}

impl ThreadFilter {
    /// Renders the filter clauses, one per supplied predicate, in a fixed
    /// order: status, assignee, customer, then the implicit open/snoozed
    /// clause unless resolved threads were requested.
    #[must_use]
    pub fn clauses(&self) -> Vec<String> {
        let mut clauses = Vec::new();
        if let Some(status) = self.status {
            clauses.push(format!("status: {status}"));
        }
        if self.assignee_id.is_some() {
            clauses.push("assignedToUser: {userId: $assigneeId}".to_string());
        }
        if self.customer_id.is_some() {
            clauses.push("customerId: $customerId".to_string());
        }
        if !self.include_resolved {
            clauses.push("status: {isIn: [TODO, SNOOZED]}".to_string());
        }
        clauses
    }

    /// Variable declarations and values for the id predicates.
    fn bindings(&self) -> (Vec<&'static str>, Map<String, Value>) {
        let mut declarations = Vec::new();
        let mut variables = Map::new();
        if let Some(assignee_id) = &self.assignee_id {
            declarations.push("$assigneeId: ID!");
            variables.insert("assigneeId".to_string(), Value::String(assignee_id.clone()));
        }
        if let Some(customer_id) = &self.customer_id {
            declarations.push("$customerId: ID!");
            variables.insert("customerId".to_string(), Value::String(customer_id.clone()));
        }
        (declarations, variables)
    }
}

/// Builds the thread listing query.
#[must_use]
pub fn threads_query(filter: &ThreadFilter, limit: u32) -> Document {
    let (declarations, variables) = filter.bindings();
    let declarations = if declarations.is_empty() {
        String::new()
    } else {
        format!("({})", declarations.join(", "))
    };

    let clauses = filter.clauses();
    let filters_arg = if clauses.is_empty() {
        String::new()
    } else {
        format!("filters: {{{}}}, ", clauses.join(", "))
    };

    let text = format!(
        "query GetThreads{declarations} {{
    threads({filters_arg}first: {limit}) {{
        edges {{
            node {{
                id
                title
                description
                status
                statusChangedAt
                assignedToUser {{
                    id
                    fullName
                }}
                customer {{
                    id
                    fullName
                    email {{
                        email
                    }}
                }}
                createdAt
                updatedAt
                priority
                labels {{
                    id
                    labelType {{
                        name
                    }}
                }}
            }}
        }}
        pageInfo {{
            hasNextPage
            endCursor
        }}
    }}
}}"
    );

    Document { text, variables }
}

/// Builds the free-text search query.
#[must_use]
pub fn search_threads_query(term: &str, limit: u32) -> Document {
    let text = format!(
        "query SearchThreads($term: String!) {{
    searchThreads(searchQuery: {{
        term: $term
    }}, first: {limit}) {{
        edges {{
            node {{
                thread {{
                    id
                    title
                    description
                    status
                    customer {{
                        id
                        fullName
                        email {{
                            email
                        }}
                    }}
                    createdAt
                    updatedAt
                }}
            }}
        }}
    }}
}}"
    );

    let mut document = Document::new(text);
    document
        .variables
        .insert("term".to_string(), Value::String(term.to_string()));
    document
}

/// Builds the thread detail query, including the related timeline.
#[must_use]
pub fn thread_details_query(thread_id: &str) -> Document {
    let text = format!(
        "query GetThreadDetails($threadId: ID!) {{
    thread(threadId: $threadId) {{
        id
        title
        description
        status
        statusChangedAt
        assignedToUser {{
            id
            fullName
        }}
        customer {{
            id
            fullName
            email {{
                email
            }}
            company {{
                id
                name
            }}
        }}
        createdAt
        updatedAt
        priority
        labels {{
            id
            labelType {{
                name
            }}
        }}
        timeline(first: {TIMELINE_PAGE_SIZE}) {{
            edges {{
                node {{
                    id
                    timestamp
                    actor {{
                        ... on UserActor {{
                            user {{
                                id
                                fullName
                            }}
                        }}
                        ... on CustomerActor {{
                            customer {{
                                id
                                fullName
                            }}
                        }}
                    }}
                    ... on ThreadChatTimelineEntry {{
                        chat {{
                            text
                        }}
                    }}
                    ... on ThreadNoteTimelineEntry {{
                        note {{
                            text
                        }}
                    }}
                }}
            }}
        }}
    }}
}}"
    );

    let mut document = Document::new(text);
    document
        .variables
        .insert("threadId".to_string(), Value::String(thread_id.to_string()));
    document
}

/// Builds the status-update mutation.
///
/// The mutation selects both the mutated thread and the nullable `error`
/// payload, so a validation failure reported by the remote side comes back
/// as data rather than as a fault.
#[must_use]
pub fn update_thread_status_mutation(thread_id: &str, status: ThreadStatus) -> Document {
    let text = format!(
        "mutation UpdateThreadStatus($threadId: ID!) {{
    updateThread(input: {{
        threadId: $threadId
        status: {status}
    }}) {{
        thread {{
            id
            status
            statusChangedAt
        }}
        error {{
            message
            code
        }}
    }}
}}"
    );

    let mut document = Document::new(text);
    document
        .variables
        .insert("threadId".to_string(), Value::String(thread_id.to_string()));
    document
}

/// Builds the note-creation mutation.
#[must_use]
pub fn create_thread_note_mutation(thread_id: &str, content: &str) -> Document {
    let text = "mutation AddThreadNote($threadId: ID!, $text: String!) {
    createThreadNote(input: {
        threadId: $threadId
        text: $text
    }) {
        threadNote {
            id
            text
            createdAt
        }
        error {
            message
            code
        }
    }
}"
    .to_string();

    let mut document = Document::new(text);
    document
        .variables
        .insert("threadId".to_string(), Value::String(thread_id.to_string()));
    document
        .variables
        .insert("text".to_string(), Value::String(content.to_string()));
    document
}

/// Builds the customer lookup query.
#[must_use]
pub fn customer_query(customer_id: &str) -> Document {
    let text = format!(
        "query GetCustomer($customerId: ID!) {{
    customer(customerId: $customerId) {{
        id
        fullName
        email {{
            email
            isVerified
        }}
        company {{
            id
            name
            domainName
        }}
        createdAt
        updatedAt
        tenantMemberships(first: {MEMBERSHIP_PAGE_SIZE}) {{
            edges {{
                node {{
                    tenant {{
                        id
                        name
                    }}
                }}
            }}
        }}
    }}
}}"
    );

    let mut document = Document::new(text);
    document.variables.insert(
        "customerId".to_string(),
        Value::String(customer_id.to_string()),
    );
    document
}
