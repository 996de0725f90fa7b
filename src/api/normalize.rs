//! Response normalization.
//!
//! Pure functions that unwrap the remote API's paginated `edges → node`
//! reply graphs into flat lists and records. Normalizers are total: empty or
//! missing input at any nesting level degrades to an empty result, never to
//! an error.

use serde_json::{Map, Value};

/// One page of entities plus a more-available flag.
///
/// No cursor state is retained; listings are single-page by design.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Entities in the order the remote API returned them.
    pub items: Vec<Value>,
    /// Whether the remote API reported another page.
    pub has_more: bool,
}

/// Flattens `data[root].edges[*].node` into a [`Page`].
///
/// `has_more` mirrors `data[root].pageInfo.hasNextPage`, defaulting to
/// false when the reply carries no page info.
#[must_use]
pub fn edge_nodes(data: &Value, root: &str) -> Page {
    let container = &data[root];
    let items = container["edges"]
        .as_array()
        .map(|edges| {
            edges
                .iter()
                .filter_map(|edge| {
                    let node = edge.get("node")?;
                    (!node.is_null()).then(|| node.clone())
                })
                .collect()
        })
        .unwrap_or_default();

    Page {
        items,
        has_more: container["pageInfo"]["hasNextPage"]
            .as_bool()
            .unwrap_or(false),
    }
}

/// Flattens search replies, whose payload sits one level deeper:
/// `data.searchThreads.edges[*].node.thread`.
#[must_use]
pub fn search_results(data: &Value) -> Page {
    let container = &data["searchThreads"];
    let items = container["edges"]
        .as_array()
        .map(|edges| {
            edges
                .iter()
                .filter_map(|edge| {
                    let thread = edge.get("node")?.get("thread")?;
                    (!thread.is_null()).then(|| thread.clone())
                })
                .collect()
        })
        .unwrap_or_default();

    Page {
        items,
        has_more: container["pageInfo"]["hasNextPage"]
            .as_bool()
            .unwrap_or(false),
    }
}

/// Returns the keyed record verbatim, or an empty mapping when the key is
/// absent or null.
#[must_use]
pub fn singleton(data: &Value, key: &str) -> Value {
    match data.get(key) {
        Some(value @ Value::Object(_)) => value.clone(),
        _ => Value::Object(Map::new()),
    }
}

/// Returns the nested mutation result verbatim.
///
/// A populated `error` field inside the result is data at this layer, not a
/// fault; the caller decides whether it constitutes a user-visible failure.
#[must_use]
pub fn mutation_result(data: &Value, key: &str) -> Value {
    singleton(data, key)
}
