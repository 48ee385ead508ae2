//! The research-loop state machine.
//!
//! Wires the four stage services into a cycle with one conditional exit edge:
//!
//! ```text
//! Rewriting -> Researching -> Reflecting -> {Researching | Finalizing} -> Done
//! ```
//!
//! One loop invocation processes one user turn. State is passed explicitly
//! through [`LoopState`]; nothing is captured in shared globals, so turns on
//! different threads never share mutable memory.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::errors::ResearchError;
use crate::domain::models::{LoopState, Message, Role};
use crate::services::final_analysis::FinalAnalysisGenerator;
use crate::services::query_rewriter::QueryRewriter;
use crate::services::reflection::ReflectionSummarizer;
use crate::services::research_executor::ResearchExecutor;

/// Phases of one loop invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Rewriting,
    Researching,
    Reflecting,
    Finalizing,
    Done,
}

/// Input supplied by the conversation layer for one turn.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub query: String,
    pub role: Role,
    pub chat_history: Vec<Message>,
}

/// Result of one completed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Final loop state: `final_analysis`, `sources`, and `trace` are the
    /// contract surface read back by the conversation layer.
    pub state: LoopState,

    /// Number of research iterations performed.
    pub iterations: u32,
}

pub struct ResearchLoop {
    rewriter: Arc<QueryRewriter>,
    executor: Arc<ResearchExecutor>,
    summarizer: Arc<ReflectionSummarizer>,
    finalizer: Arc<FinalAnalysisGenerator>,
    max_iterations: u32,
}

impl ResearchLoop {
    pub fn new(
        rewriter: Arc<QueryRewriter>,
        executor: Arc<ResearchExecutor>,
        summarizer: Arc<ReflectionSummarizer>,
        finalizer: Arc<FinalAnalysisGenerator>,
        max_iterations: u32,
    ) -> Self {
        Self {
            rewriter,
            executor,
            summarizer,
            finalizer,
            max_iterations: max_iterations.max(1),
        }
    }

    /// Run one full loop invocation to completion.
    ///
    /// The rewrite stage runs exactly once; re-research re-enters with the
    /// same rewritten query. Finalization is reachable only after at least
    /// one full research/reflect cycle. Exceeding the iteration cap forces a
    /// transition to finalizing with whatever evidence has been gathered.
    pub async fn run(&self, request: TurnRequest) -> Result<TurnOutcome, ResearchError> {
        let mut state = LoopState::new(request.query, request.role, request.chat_history);
        let mut phase = LoopPhase::Rewriting;
        let mut iterations = 0u32;

        while phase != LoopPhase::Done {
            phase = match phase {
                LoopPhase::Rewriting => {
                    info!(role = %state.role, "rewriting query");
                    let rewritten = self.rewriter.rewrite(&state.query, state.role).await?;
                    state.trace.push(format!("Rewritten Query: {rewritten}"));
                    state.query = rewritten;
                    LoopPhase::Researching
                }

                LoopPhase::Researching => {
                    iterations += 1;
                    let evidence = self.executor.retrieve(&state.query).await?;
                    state.corpus_evidence = evidence.corpus_evidence;
                    state.web_evidence = evidence.web_evidence;
                    state.sources.extend(evidence.sources);
                    state.trace.extend(evidence.step_log);
                    LoopPhase::Reflecting
                }

                LoopPhase::Reflecting => {
                    let reflection = self.summarizer.reflect(&state).await?;
                    state.research_complete = reflection.research_complete;
                    state.trace.push(reflection.text);

                    if state.research_complete {
                        LoopPhase::Finalizing
                    } else if iterations >= self.max_iterations {
                        warn!(
                            iterations,
                            max = self.max_iterations,
                            "iteration cap reached, forcing finalization"
                        );
                        LoopPhase::Finalizing
                    } else {
                        // Re-enter research with the same rewritten query.
                        LoopPhase::Researching
                    }
                }

                LoopPhase::Finalizing => {
                    state.final_analysis = self.finalizer.finalize(&state).await?;
                    LoopPhase::Done
                }

                LoopPhase::Done => LoopPhase::Done,
            };
        }

        info!(iterations, "research loop complete");
        Ok(TurnOutcome { state, iterations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{EvidenceItem, SummarizerConfig};
    use crate::domain::ports::{CompletionClient, CorpusSearch, WebSearch};
    use async_trait::async_trait;
    use serde_json::{Map, Value};

    /// Completion stub that routes on prompt shape and scripts the verdict.
    struct ScriptedCompletion {
        verdict: &'static str,
    }

    #[async_trait]
    impl CompletionClient for ScriptedCompletion {
        async fn complete(&self, prompt: &str) -> Result<String, ResearchError> {
            if prompt.contains("JSON Output:") {
                Ok(r#"{"rewritten_query": "focused query"}"#.to_string())
            } else if prompt.contains("Reflection:") {
                Ok(format!("1. Findings\n2. Gaps\n3. Research complete? {}", self.verdict))
            } else if prompt.starts_with("Summarize") || prompt.starts_with("Combine") {
                Ok("digest".to_string())
            } else {
                Ok("**Original Query** **Legal Context** **Case Law Summary** \
                    **Analysis and Recommendations** **Sources**"
                    .to_string())
            }
        }
    }

    struct StubCorpus;

    #[async_trait]
    impl CorpusSearch for StubCorpus {
        async fn search(&self, _: &str, _: usize) -> Result<Vec<EvidenceItem>, ResearchError> {
            let mut metadata = Map::new();
            metadata.insert("source".to_string(), Value::String("ipc.txt".to_string()));
            Ok(vec![EvidenceItem::Document {
                content: "corpus passage".to_string(),
                metadata,
            }])
        }
    }

    struct StubWeb;

    #[async_trait]
    impl WebSearch for StubWeb {
        async fn search(&self, _: &str, _: usize) -> Result<Vec<EvidenceItem>, ResearchError> {
            Ok(vec![EvidenceItem::Web {
                content: "web snippet".to_string(),
                url: "https://example.com".to_string(),
                title: "Example".to_string(),
            }])
        }
    }

    fn research_loop(verdict: &'static str, max_iterations: u32) -> ResearchLoop {
        let completion: Arc<dyn CompletionClient> = Arc::new(ScriptedCompletion { verdict });
        let summarizer = Arc::new(ReflectionSummarizer::new(
            completion.clone(),
            SummarizerConfig::default(),
        ));
        ResearchLoop::new(
            Arc::new(QueryRewriter::new(completion.clone())),
            Arc::new(ResearchExecutor::new(Arc::new(StubCorpus), Arc::new(StubWeb), 5, 5)),
            summarizer.clone(),
            Arc::new(FinalAnalysisGenerator::new(completion, summarizer, 1_500)),
            max_iterations,
        )
    }

    fn request() -> TurnRequest {
        TurnRequest {
            query: "noise pollution rules".to_string(),
            role: Role::Citizen,
            chat_history: Vec::new(),
        }
    }

    #[tokio::test]
    async fn yes_verdict_terminates_after_one_cycle() {
        let outcome = research_loop("YES", 5).run(request()).await.unwrap();

        assert_eq!(outcome.iterations, 1);
        assert!(outcome.state.research_complete);
        assert!(!outcome.state.final_analysis.is_empty());
    }

    #[tokio::test]
    async fn no_verdict_is_forced_to_finalize_at_the_cap() {
        let outcome = research_loop("NO", 3).run(request()).await.unwrap();

        assert_eq!(outcome.iterations, 3);
        assert!(!outcome.state.research_complete);
        assert!(!outcome.state.final_analysis.is_empty());
    }

    #[tokio::test]
    async fn query_is_rewritten_once_and_reused() {
        let outcome = research_loop("NO", 2).run(request()).await.unwrap();

        assert_eq!(outcome.state.query, "focused query");
        let rewrites = outcome
            .state
            .trace
            .iter()
            .filter(|line| line.starts_with("Rewritten Query: "))
            .count();
        assert_eq!(rewrites, 1);
    }

    #[tokio::test]
    async fn trace_grows_monotonically_across_iterations() {
        let outcome = research_loop("NO", 2).run(request()).await.unwrap();

        // 1 rewrite line + 2 iterations x (2 step-log lines + 1 reflection).
        assert_eq!(outcome.state.trace.len(), 7);
        // Sources accumulate without dedup: 2 per iteration.
        assert_eq!(outcome.state.sources.len(), 4);
    }
}
