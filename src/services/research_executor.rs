//! Research stage: parallel evidence gathering.
//!
//! Fans out to both evidence providers for the current query and joins on
//! both results — a strict fan-out/fan-in, not a race. No partial results.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::errors::ResearchError;
use crate::domain::models::{EvidenceItem, SourceCitation};
use crate::domain::ports::{CorpusSearch, WebSearch};

/// Normalized output of one retrieval pass.
#[derive(Debug, Clone)]
pub struct RetrievedEvidence {
    /// Corpus hits concatenated in ranked order.
    pub corpus_evidence: String,

    /// Web hits concatenated in ranked order.
    pub web_evidence: String,

    /// Citations for this pass: one per corpus hit with usable metadata plus
    /// one per web hit regardless of content.
    pub sources: Vec<SourceCitation>,

    /// Trace lines recording the raw per-source content.
    pub step_log: Vec<String>,
}

pub struct ResearchExecutor {
    corpus: Arc<dyn CorpusSearch>,
    web: Arc<dyn WebSearch>,
    corpus_top_k: usize,
    web_max_results: usize,
}

impl ResearchExecutor {
    pub fn new(
        corpus: Arc<dyn CorpusSearch>,
        web: Arc<dyn WebSearch>,
        corpus_top_k: usize,
        web_max_results: usize,
    ) -> Self {
        Self {
            corpus,
            web,
            corpus_top_k,
            web_max_results,
        }
    }

    /// Gather evidence from both providers concurrently.
    ///
    /// Both calls run to completion before any result is inspected; a web
    /// provider failure propagates only after the corpus call has finished.
    pub async fn retrieve(&self, query: &str) -> Result<RetrievedEvidence, ResearchError> {
        info!(query, "performing research");

        let (corpus_result, web_result) = tokio::join!(
            self.corpus.search(query, self.corpus_top_k),
            self.web.search(query, self.web_max_results),
        );

        let corpus_hits = corpus_result?;
        let web_hits = web_result?;

        let mut sources = Vec::new();

        let corpus_evidence = concat_evidence(&corpus_hits, &mut sources);
        let web_evidence = concat_evidence(&web_hits, &mut sources);

        debug!(
            corpus_hits = corpus_hits.len(),
            web_hits = web_hits.len(),
            citations = sources.len(),
            "research pass complete"
        );

        let step_log = vec![
            format!("Corpus Results: {corpus_evidence}"),
            format!("Web Results: {web_evidence}"),
        ];

        Ok(RetrievedEvidence {
            corpus_evidence,
            web_evidence,
            sources,
            step_log,
        })
    }
}

/// Concatenate hit contents in ranked order, collecting citations for the
/// items that are citable.
fn concat_evidence(hits: &[EvidenceItem], sources: &mut Vec<SourceCitation>) -> String {
    let mut content = String::new();
    for hit in hits {
        content.push_str(hit.content());
        content.push_str("\n\n");
        if let Some(citation) = hit.citation() {
            sources.push(citation);
        }
    }
    content
}
