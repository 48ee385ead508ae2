//! Evidence normalization types.
//!
//! Provider results are normalized into [`EvidenceItem`] at the adapter
//! boundary so downstream stages never branch on result shape. Citations are
//! derived from evidence items once, at retrieval time, and are immutable
//! afterwards.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A typed record identifying where a piece of evidence came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceCitation {
    /// A passage from the indexed legal corpus.
    Document { metadata: Map<String, Value> },

    /// A ranked web snippet.
    Web { url: String, title: String },
}

/// One ranked result from an evidence provider, normalized on receipt.
#[derive(Debug, Clone, PartialEq)]
pub enum EvidenceItem {
    /// Indexed-corpus passage with whatever metadata the index stored for it.
    Document {
        content: String,
        metadata: Map<String, Value>,
    },

    /// Web search snippet.
    Web {
        content: String,
        url: String,
        title: String,
    },
}

impl EvidenceItem {
    pub fn content(&self) -> &str {
        match self {
            EvidenceItem::Document { content, .. } | EvidenceItem::Web { content, .. } => content,
        }
    }

    /// Citation for this item, if it carries enough identity to cite.
    ///
    /// Corpus passages without metadata (e.g. the missing-index sentinel) are
    /// not citable; web snippets always are, even with empty content.
    pub fn citation(&self) -> Option<SourceCitation> {
        match self {
            EvidenceItem::Document { metadata, .. } => {
                if metadata.is_empty() {
                    None
                } else {
                    Some(SourceCitation::Document {
                        metadata: metadata.clone(),
                    })
                }
            }
            EvidenceItem::Web { url, title, .. } => Some(SourceCitation::Web {
                url: url.clone(),
                title: title.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_without_metadata_is_not_citable() {
        let item = EvidenceItem::Document {
            content: "index missing".to_string(),
            metadata: Map::new(),
        };
        assert!(item.citation().is_none());
    }

    #[test]
    fn web_item_is_always_citable() {
        let item = EvidenceItem::Web {
            content: String::new(),
            url: "https://example.com".to_string(),
            title: "Example".to_string(),
        };
        assert!(matches!(item.citation(), Some(SourceCitation::Web { .. })));
    }
}
