//! Dependency wiring.
//!
//! Builds the fully connected research stack from validated configuration.
//! Credential resolution happens here, before any loop stage runs, so a
//! missing key is a startup failure rather than a mid-loop one.

use std::sync::Arc;

use crate::domain::errors::ResearchError;
use crate::domain::models::Config;
use crate::domain::ports::SessionStore;
use crate::infrastructure::completion::GroqCompletionClient;
use crate::infrastructure::search::{LocalIndexSearch, TavilyWebSearch};
use crate::services::{
    FinalAnalysisGenerator, QueryRewriter, ReflectionSummarizer, ResearchExecutor, ResearchLoop,
    ThreadRegistry,
};

/// The wired application: the loop plus the registry that hosts its threads.
pub struct ResearchStack {
    pub research_loop: Arc<ResearchLoop>,
    pub registry: Arc<ThreadRegistry>,
}

/// Resolve a credential from config, falling back to an environment variable.
fn resolve_credential(configured: Option<&String>, env_var: &str) -> String {
    configured
        .cloned()
        .filter(|k| !k.trim().is_empty())
        .or_else(|| std::env::var(env_var).ok())
        .unwrap_or_default()
}

/// Wire every adapter and service from configuration.
///
/// # Errors
///
/// Returns `ResearchError::Configuration` when a required credential is
/// absent or an HTTP client cannot be constructed.
pub fn build_research_stack(
    config: &Config,
    store: Arc<dyn SessionStore>,
) -> Result<ResearchStack, ResearchError> {
    let completion_key = resolve_credential(config.completion.api_key.as_ref(), "GROQ_API_KEY");
    let web_key = resolve_credential(config.web_search.api_key.as_ref(), "TAVILY_API_KEY");

    let completion = Arc::new(GroqCompletionClient::new(
        completion_key,
        &config.completion,
    )?);
    let web_search = Arc::new(TavilyWebSearch::new(web_key, &config.web_search)?);
    let corpus_search = Arc::new(LocalIndexSearch::new(config.corpus.index_path.clone()));

    let rewriter = Arc::new(QueryRewriter::new(completion.clone()));
    let executor = Arc::new(ResearchExecutor::new(
        corpus_search,
        web_search,
        config.corpus.top_k,
        config.web_search.max_results,
    ));
    let summarizer = Arc::new(ReflectionSummarizer::new(
        completion.clone(),
        config.summarizer.clone(),
    ));
    let finalizer = Arc::new(FinalAnalysisGenerator::new(
        completion,
        summarizer.clone(),
        config.summarizer.trace_compression_threshold_words,
    ));

    let research_loop = Arc::new(ResearchLoop::new(
        rewriter,
        executor,
        summarizer,
        finalizer,
        config.research_loop.max_iterations,
    ));
    let registry = Arc::new(ThreadRegistry::new(store));

    Ok(ResearchStack {
        research_loop,
        registry,
    })
}
