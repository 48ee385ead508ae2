//! Pluggable conversation persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::ResearchError;
use crate::domain::models::Conversation;

/// Snapshot persistence for conversation threads.
///
/// Consumed by the thread registry, never implemented inside the core loop.
/// The registry must function correctly with the no-op backend.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a snapshot of the conversation keyed by its thread id.
    async fn save(&self, conversation: &Conversation) -> Result<(), ResearchError>;

    /// Load the latest snapshot for a thread, if one exists.
    async fn load(&self, thread_id: Uuid) -> Result<Option<Conversation>, ResearchError>;
}

/// No-op persistence backend. Session lifetime = process lifetime.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSessionStore;

#[async_trait]
impl SessionStore for NullSessionStore {
    async fn save(&self, _conversation: &Conversation) -> Result<(), ResearchError> {
        Ok(())
    }

    async fn load(&self, _thread_id: Uuid) -> Result<Option<Conversation>, ResearchError> {
        Ok(None)
    }
}
