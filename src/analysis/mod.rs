//! Pattern analysis workflow.
//!
//! The one multi-call operation in the crate: given a reference thread,
//! chain a detail lookup, a derived free-text search, and a
//! filter/truncate pass into a single ranked report of likely-related
//! threads. Ranking is whatever order the upstream search returns; this
//! module does not re-score candidates.

use crate::api::{GraphqlExecutor, normalize, queries};
use crate::Result;
use serde::Serialize;
use serde_json::Value;

/// Upper bound on candidates requested from the search step.
const CANDIDATE_SEARCH_LIMIT: u32 = 10;

/// Maximum similar threads included in the report.
const MAX_SIMILAR_THREADS: usize = 5;

/// Reference-thread summary carried in the report.
#[derive(Debug, Clone, Serialize)]
pub struct ThreadSummary {
    /// Thread id.
    pub id: Option<String>,
    /// Thread title.
    pub title: Option<String>,
    /// Current status literal.
    pub status: Option<String>,
}

/// Metadata about the analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisStats {
    /// Candidates found after self-exclusion, before truncation.
    pub total_found: usize,
    /// The exact search term used for the candidate search.
    pub search_terms: String,
}

/// A completed pattern analysis.
#[derive(Debug, Clone, Serialize)]
pub struct PatternReport {
    /// Summary of the reference thread.
    pub reference_thread: ThreadSummary,
    /// Candidate threads, in upstream search order.
    pub similar_threads: Vec<Value>,
    /// Analysis metadata.
    pub analysis: AnalysisStats,
}

/// Outcome of the pattern-analysis workflow.
///
/// A missing reference thread is a legitimate business outcome, not a
/// fault; it serializes to `{"error": "Thread not found"}`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PatternOutcome {
    /// The reference thread does not exist.
    NotFound {
        /// Fixed business-outcome message.
        error: String,
    },
    /// The analysis completed.
    Report(PatternReport),
}

impl PatternOutcome {
    /// Message reported when the reference lookup yields nothing.
    pub const NOT_FOUND: &'static str = "Thread not found";

    fn not_found() -> Self {
        Self::NotFound {
            error: Self::NOT_FOUND.to_string(),
        }
    }
}

/// Finds threads similar to a reference thread.
///
/// Fetches the reference thread, searches with its space-joined title and
/// description, drops the reference itself from the candidates, and
/// reports the first five that remain. `_days_back` is accepted for
/// argument-schema compatibility but is not currently translated into any
/// query predicate.
///
/// # Errors
///
/// Transport and application errors from the underlying calls propagate
/// unmodified; only the missing-reference case is converted into the typed
/// [`PatternOutcome::NotFound`] result.
pub async fn analyze_thread_patterns<E: GraphqlExecutor>(
    executor: &E,
    thread_id: &str,
    _days_back: u32,
) -> Result<PatternOutcome> {
    let document = queries::thread_details_query(thread_id);
    let data = executor.execute(&document.text, &document.variables).await?;
    let reference = normalize::singleton(&data, "thread");

    let Some(fields) = reference.as_object().filter(|fields| !fields.is_empty()) else {
        tracing::info!(thread_id, "Reference thread not found, skipping search");
        return Ok(PatternOutcome::not_found());
    };

    let title = fields.get("title").and_then(Value::as_str).unwrap_or("");
    let description = fields
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or("");
    let search_terms = format!("{title} {description}");

    let search = queries::search_threads_query(&search_terms, CANDIDATE_SEARCH_LIMIT);
    let search_data = executor.execute(&search.text, &search.variables).await?;

    let candidates: Vec<Value> = normalize::search_results(&search_data)
        .items
        .into_iter()
        .filter(|thread| thread.get("id").and_then(Value::as_str) != Some(thread_id))
        .collect();
    let total_found = candidates.len();

    let similar_threads: Vec<Value> = candidates.into_iter().take(MAX_SIMILAR_THREADS).collect();
    tracing::debug!(
        thread_id,
        total_found,
        reported = similar_threads.len(),
        "Pattern analysis complete"
    );

    Ok(PatternOutcome::Report(PatternReport {
        reference_thread: ThreadSummary {
            id: field_string(fields, "id"),
            title: field_string(fields, "title"),
            status: field_string(fields, "status"),
        },
        similar_threads,
        analysis: AnalysisStats {
            total_found,
            search_terms,
        },
    }))
}

fn field_string(fields: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}
