//! Domain models.

pub mod citation;
pub mod config;
pub mod role;
pub mod session;
pub mod state;

pub use citation::{EvidenceItem, SourceCitation};
pub use config::{
    CompletionConfig, Config, CorpusConfig, DigestStrategy, LoggingConfig, LoopConfig,
    RetryConfig, SummarizerConfig, WebSearchConfig,
};
pub use role::Role;
pub use session::Conversation;
pub use state::{LoopState, Message, MessageRole};
