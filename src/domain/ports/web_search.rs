//! Web search port.

use async_trait::async_trait;

use crate::domain::errors::ResearchError;
use crate::domain::models::EvidenceItem;

/// External ranked-snippet search.
///
/// Requires a pre-configured access credential; implementations fail
/// construction (not individual calls) when it is absent.
///
/// # Errors
/// - `ResearchError::ProviderUnavailable` - the provider cannot be reached
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Return up to `max_results` snippets for `query`, ranked.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<EvidenceItem>, ResearchError>;
}
