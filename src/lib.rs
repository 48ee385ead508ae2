//! Lara - Iterative Legal Research Assistant
//!
//! Lara answers legal questions by running an iterative retrieval loop: it
//! rewrites the user's question into a focused search query, gathers evidence
//! from an indexed legal corpus and live web search in parallel, reflects on
//! the digested evidence, and either researches again or synthesizes a final
//! role-tailored analysis with citations.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Loop state, evidence types, and provider ports
//! - **Service Layer** (`services`): The loop stages and their state machine
//! - **Infrastructure Layer** (`infrastructure`): Provider adapters, config, persistence
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use lara::infrastructure::{build_research_stack, ConfigLoader};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     // Wire adapters and run a turn
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{ResearchError, ResearchResult};
pub use domain::models::{
    Config, Conversation, DigestStrategy, EvidenceItem, LoopState, Message, MessageRole, Role,
    SourceCitation,
};
pub use domain::ports::{
    CompletionClient, CorpusSearch, NullSessionStore, SessionStore, WebSearch,
};
pub use infrastructure::{build_research_stack, ConfigError, ConfigLoader, ResearchStack};
pub use services::{ResearchLoop, ThreadRegistry, TurnOutcome, TurnRequest};
