//! Service layer: the research-loop stages and their coordination.

pub mod final_analysis;
pub mod loop_controller;
pub mod prompts;
pub mod query_rewriter;
pub mod reflection;
pub mod research_executor;
pub mod thread_registry;

pub use final_analysis::FinalAnalysisGenerator;
pub use loop_controller::{LoopPhase, ResearchLoop, TurnOutcome, TurnRequest};
pub use query_rewriter::QueryRewriter;
pub use reflection::{verdict_signals_complete, Reflection, ReflectionSummarizer};
pub use research_executor::{ResearchExecutor, RetrievedEvidence};
pub use thread_registry::ThreadRegistry;
