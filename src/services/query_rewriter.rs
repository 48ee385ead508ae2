//! Query rewrite stage.
//!
//! Turns a raw user query (plus role) into a search-oriented reformulation.
//! Runs exactly once per loop invocation; re-research reuses its output.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::errors::ResearchError;
use crate::domain::models::Role;
use crate::domain::ports::CompletionClient;
use crate::services::prompts;

pub struct QueryRewriter {
    completion: Arc<dyn CompletionClient>,
}

impl QueryRewriter {
    pub fn new(completion: Arc<dyn CompletionClient>) -> Self {
        Self { completion }
    }

    /// Produce a focused search query for the given role.
    ///
    /// A provider error propagates as `GenerationFailure`. A structured-parse
    /// failure is recovered locally by treating the raw generated text as the
    /// rewritten query; it never surfaces to the caller.
    pub async fn rewrite(&self, query: &str, role: Role) -> Result<String, ResearchError> {
        let prompt = prompts::rewrite(role, query);
        let generated = self.completion.complete(&prompt).await?;

        let rewritten = match parse_rewritten_query(&generated) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(%err, "structured rewrite parse failed, using raw text");
                let raw = generated.trim();
                if raw.is_empty() {
                    // Degenerate fallback: keep searching with the original.
                    query.to_string()
                } else {
                    raw.to_string()
                }
            }
        };

        debug!(role = %role, rewritten = %rewritten, "query rewritten");
        Ok(rewritten)
    }
}

/// Extract the `rewritten_query` field from generated text that should be a
/// JSON object, tolerating prose around the object.
fn parse_rewritten_query(text: &str) -> Result<String, ResearchError> {
    let value = extract_json_object(text)?;
    value
        .get("rewritten_query")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| {
            ResearchError::StructuredParse("missing or empty 'rewritten_query' field".to_string())
        })
}

fn extract_json_object(text: &str) -> Result<Value, ResearchError> {
    if let Ok(value) = serde_json::from_str::<Value>(text.trim()) {
        return Ok(value);
    }

    // Models often wrap the object in prose or code fences; take the
    // outermost brace span and try again.
    let start = text.find('{');
    let end = text.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => {
            Ok(serde_json::from_str::<Value>(&text[start..=end])?)
        }
        _ => Err(ResearchError::StructuredParse(
            "no JSON object in generated text".to_string(),
        )),
    }
}
