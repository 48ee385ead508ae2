//! Loop state and conversation messages.

use serde::{Deserialize, Serialize};

use super::citation::SourceCitation;
use super::role::Role;

/// Sender of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One prior turn in a conversation thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Mutable state of one in-flight research-loop invocation.
///
/// Owned exclusively by the single loop execution processing one user turn.
/// A fresh instance is created per turn, seeded with the thread's prior
/// `chat_history`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoopState {
    /// Current search query; overwritten by the rewrite stage.
    pub query: String,

    /// Prompt-variant selector, fixed for the conversation.
    pub role: Role,

    /// Append-only log of every stage's textual output. Compressed (never
    /// truncated) before final synthesis when it grows past the threshold.
    pub trace: Vec<String>,

    /// Citations gathered across all iterations. Duplicates allowed.
    pub sources: Vec<SourceCitation>,

    /// Most recent normalized corpus content; overwritten each iteration.
    pub corpus_evidence: String,

    /// Most recent normalized web content; overwritten each iteration.
    pub web_evidence: String,

    /// Set by the reflection stage; once true the loop exits on next check.
    pub research_complete: bool,

    /// Terminal value, written exactly once by the finalize stage.
    pub final_analysis: String,

    /// Prior turns, appended to by the conversation layer, not by the loop.
    pub chat_history: Vec<Message>,
}

impl LoopState {
    pub fn new(query: impl Into<String>, role: Role, chat_history: Vec<Message>) -> Self {
        Self {
            query: query.into(),
            role,
            chat_history,
            ..Self::default()
        }
    }
}
