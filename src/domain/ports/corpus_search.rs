//! Indexed-corpus search port.

use async_trait::async_trait;

use crate::domain::errors::ResearchError;
use crate::domain::models::EvidenceItem;

/// Nearest-neighbor lookup over pre-indexed legal text chunks.
///
/// Index building and document ingestion live outside the core; this port
/// only reads. Implementations must tolerate a missing or unreadable index by
/// returning a single descriptive sentinel item (with empty metadata) rather
/// than erroring, so the loop proceeds with degraded evidence.
#[async_trait]
pub trait CorpusSearch: Send + Sync {
    /// Return up to `k` passages for `query`, most relevant first.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<EvidenceItem>, ResearchError>;
}
