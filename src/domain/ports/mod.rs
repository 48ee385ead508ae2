//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that infrastructure adapters implement:
//! - `CompletionClient`: text generation
//! - `CorpusSearch`: indexed legal corpus lookup
//! - `WebSearch`: external ranked-snippet search
//! - `SessionStore`: pluggable conversation persistence
//!
//! These contracts keep the research loop independent of specific providers.

pub mod completion;
pub mod corpus_search;
pub mod session_store;
pub mod web_search;

pub use completion::CompletionClient;
pub use corpus_search::CorpusSearch;
pub use session_store::{NullSessionStore, SessionStore};
pub use web_search::WebSearch;
