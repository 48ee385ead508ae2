//! Domain errors for the Lara research loop.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can surface from a research-loop invocation or its collaborators.
#[derive(Debug, Error)]
pub enum ResearchError {
    /// A required credential or setting is missing. Raised during wiring,
    /// before any loop iteration starts.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An evidence provider cannot be reached. The corpus provider recovers
    /// locally with a sentinel passage; the web provider propagates this.
    #[error("Provider '{provider}' unavailable: {reason}")]
    ProviderUnavailable { provider: String, reason: String },

    /// The text-completion provider errored or timed out. Aborts the current
    /// turn; the trace accumulated so far stays with the conversation.
    #[error("Generation failed: {0}")]
    GenerationFailure(String),

    /// Expected structured (JSON) output could not be parsed. Recovered
    /// locally by callers that have a raw-text fallback.
    #[error("Structured output parse failed: {0}")]
    StructuredParse(String),

    /// Registry lookup for an unknown conversation thread.
    #[error("Thread not found: {0}")]
    ThreadNotFound(Uuid),
}

pub type ResearchResult<T> = Result<T, ResearchError>;

impl From<serde_json::Error> for ResearchError {
    fn from(err: serde_json::Error) -> Self {
        ResearchError::StructuredParse(err.to_string())
    }
}
