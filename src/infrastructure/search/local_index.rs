//! Local corpus index adapter.
//!
//! Reads a pre-built JSON chunk index produced by the ingestion pipeline (a
//! flat array of `{content, metadata}` entries) and ranks entries by term
//! overlap with the query. A missing or unreadable index degrades to a single
//! sentinel passage instead of an error, so the loop proceeds on web evidence
//! alone.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::domain::errors::ResearchError;
use crate::domain::models::EvidenceItem;
use crate::domain::ports::CorpusSearch;

#[derive(Debug, Deserialize)]
struct IndexEntry {
    content: String,
    #[serde(default)]
    metadata: Map<String, Value>,
}

pub struct LocalIndexSearch {
    index_path: PathBuf,
}

impl LocalIndexSearch {
    pub fn new(index_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
        }
    }

    async fn load_entries(&self) -> Result<Vec<IndexEntry>, String> {
        let bytes = tokio::fs::read(&self.index_path)
            .await
            .map_err(|e| e.to_string())?;
        serde_json::from_slice(&bytes).map_err(|e| e.to_string())
    }

    fn sentinel(&self, reason: &str) -> EvidenceItem {
        EvidenceItem::Document {
            content: format!(
                "Legal corpus index not available at {}: {reason}.",
                self.index_path.display()
            ),
            metadata: Map::new(),
        }
    }
}

#[async_trait]
impl CorpusSearch for LocalIndexSearch {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<EvidenceItem>, ResearchError> {
        let entries = match self.load_entries().await {
            Ok(entries) => entries,
            Err(reason) => {
                warn!(%reason, path = %self.index_path.display(), "corpus index unavailable");
                return Ok(vec![self.sentinel(&reason)]);
            }
        };

        let terms: Vec<String> = query
            .split_whitespace()
            .map(str::to_lowercase)
            .filter(|t| t.len() > 2)
            .collect();

        let mut scored: Vec<(f64, IndexEntry)> = entries
            .into_iter()
            .filter_map(|entry| {
                let score = score_entry(&entry.content, &terms);
                (score > 0.0).then_some((score, entry))
            })
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        debug!(candidates = scored.len(), k, "corpus search ranked");

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, entry)| EvidenceItem::Document {
                content: entry.content,
                metadata: entry.metadata,
            })
            .collect())
    }
}

/// Term-overlap score: matched unique terms dominate, total occurrences break
/// ties among passages matching the same term set.
fn score_entry(content: &str, terms: &[String]) -> f64 {
    if terms.is_empty() {
        return 0.0;
    }

    let haystack = content.to_lowercase();
    let mut matched = 0usize;
    let mut occurrences = 0usize;

    for term in terms {
        let count = haystack.matches(term.as_str()).count();
        if count > 0 {
            matched += 1;
            occurrences += count;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    {
        matched as f64 + occurrences as f64 / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn index_file(entries: serde_json::Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{entries}").unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn missing_index_returns_sentinel_not_error() {
        let search = LocalIndexSearch::new("/nonexistent/index.json");

        let hits = search.search("noise pollution", 5).await.unwrap();

        assert_eq!(hits.len(), 1);
        let EvidenceItem::Document { content, metadata } = &hits[0] else {
            panic!("expected document sentinel");
        };
        assert!(content.contains("index not available"));
        assert!(metadata.is_empty());
        // Sentinel must not be citable.
        assert!(hits[0].citation().is_none());
    }

    #[tokio::test]
    async fn ranks_by_term_overlap_and_caps_at_k() {
        let file = index_file(json!([
            {"content": "Noise pollution limits under the Environment Protection Act",
             "metadata": {"source": "epa.txt"}},
            {"content": "Unrelated contract law passage", "metadata": {"source": "contract.txt"}},
            {"content": "Residential noise complaints and noise rules", "metadata": {}},
            {"content": "noise noise noise pollution pollution", "metadata": {"source": "x.txt"}}
        ]));

        let search = LocalIndexSearch::new(file.path());
        let hits = search.search("noise pollution rules", 2).await.unwrap();

        assert_eq!(hits.len(), 2);
        // The repetition-heavy passage matches both terms most often.
        assert!(hits[0].content().starts_with("noise noise"));
        // Non-matching passages are excluded entirely.
        assert!(hits.iter().all(|h| !h.content().contains("contract")));
    }

    #[tokio::test]
    async fn malformed_index_degrades_to_sentinel() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        file.flush().unwrap();

        let search = LocalIndexSearch::new(file.path());
        let hits = search.search("anything legal", 5).await.unwrap();

        assert_eq!(hits.len(), 1);
        assert!(hits[0].content().contains("index not available"));
    }
}
