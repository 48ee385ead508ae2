//! Text-completion port.

use async_trait::async_trait;

use crate::domain::errors::ResearchError;

/// Stateless request/response text generation.
///
/// Implementations resolve the model identifier and temperature from
/// configuration and must be `Send + Sync` for use across tokio tasks.
///
/// # Errors
/// - `ResearchError::GenerationFailure` - the provider errored or timed out
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Run one completion call and return the generated text.
    async fn complete(&self, prompt: &str) -> Result<String, ResearchError>;
}
