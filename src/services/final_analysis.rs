//! Finalize stage: render the structured answer from the accumulated trace.

use std::sync::Arc;

use tracing::info;

use crate::domain::errors::ResearchError;
use crate::domain::models::LoopState;
use crate::domain::ports::CompletionClient;
use crate::services::prompts;
use crate::services::reflection::ReflectionSummarizer;

pub struct FinalAnalysisGenerator {
    completion: Arc<dyn CompletionClient>,
    summarizer: Arc<ReflectionSummarizer>,
    compression_threshold_words: usize,
}

impl FinalAnalysisGenerator {
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        summarizer: Arc<ReflectionSummarizer>,
        compression_threshold_words: usize,
    ) -> Self {
        Self {
            completion,
            summarizer,
            compression_threshold_words,
        }
    }

    /// Produce the final structured analysis.
    ///
    /// The full trace is joined with newlines; when it exceeds the word
    /// threshold it is first compressed through the digest routine so the
    /// final prompt stays bounded across many loop iterations. The generated
    /// text is returned as-is; no structural validation is performed.
    pub async fn finalize(&self, state: &LoopState) -> Result<String, ResearchError> {
        info!("generating final analysis");

        let mut steps = state.trace.join("\n");
        if word_count(&steps) > self.compression_threshold_words {
            steps = self
                .summarizer
                .digest(&steps, "research steps", &state.query)
                .await?;
        }

        let prompt = prompts::final_analysis(state.role, &state.query, &steps);
        self.completion.complete(&prompt).await
    }
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
