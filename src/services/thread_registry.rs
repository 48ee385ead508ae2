//! In-memory conversation thread registry.
//!
//! Holds the set of known threads for the lifetime of the process. Snapshots
//! are handed to the pluggable [`SessionStore`] after every recorded turn;
//! the registry works unchanged with the no-op backend. Concurrent turns on
//! the same thread id must be serialized by the caller; the registry provides
//! no per-thread lock.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::errors::ResearchError;
use crate::domain::models::{Conversation, LoopState, Message, Role};
use crate::domain::ports::SessionStore;

pub struct ThreadRegistry {
    threads: RwLock<HashMap<Uuid, Conversation>>,
    store: Arc<dyn SessionStore>,
}

impl ThreadRegistry {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            threads: RwLock::new(HashMap::new()),
            store,
        }
    }

    /// Create a fresh thread for a role and return its identifier.
    pub async fn new_thread(&self, role: Role) -> Uuid {
        let conversation = Conversation::new(role);
        let thread_id = conversation.thread_id;
        self.threads.write().await.insert(thread_id, conversation);
        debug!(%thread_id, "thread created");
        thread_id
    }

    /// All known thread identifiers. No ordering guarantee.
    pub async fn list_threads(&self) -> Vec<Uuid> {
        self.threads.read().await.keys().copied().collect()
    }

    /// Latest loop state for a thread.
    ///
    /// Falls back to the session store for threads not resident in memory;
    /// an unknown id is `ThreadNotFound`, which callers typically surface as
    /// a fresh default state rather than a hard failure.
    pub async fn get_state(&self, thread_id: Uuid) -> Result<LoopState, ResearchError> {
        if let Some(conversation) = self.threads.read().await.get(&thread_id) {
            return Ok(conversation.state.clone());
        }

        if let Some(conversation) = self.store.load(thread_id).await? {
            let state = conversation.state.clone();
            self.threads.write().await.insert(thread_id, conversation);
            return Ok(state);
        }

        Err(ResearchError::ThreadNotFound(thread_id))
    }

    /// Record a completed turn: replace the thread's state, append the turn
    /// to its chat history, and snapshot through the session store.
    pub async fn record_turn(
        &self,
        thread_id: Uuid,
        user_query: &str,
        mut state: LoopState,
    ) -> Result<(), ResearchError> {
        state.chat_history.push(Message::user(user_query));
        state
            .chat_history
            .push(Message::assistant(state.final_analysis.clone()));

        let snapshot = {
            let mut threads = self.threads.write().await;
            let conversation = threads
                .get_mut(&thread_id)
                .ok_or(ResearchError::ThreadNotFound(thread_id))?;
            conversation.state = state;
            conversation.clone()
        };

        self.store.save(&snapshot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::NullSessionStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[tokio::test]
    async fn new_threads_are_listed() {
        let registry = ThreadRegistry::new(Arc::new(NullSessionStore));

        let a = registry.new_thread(Role::Citizen).await;
        let b = registry.new_thread(Role::Lawyer).await;

        let listed = registry.list_threads().await;
        assert_eq!(listed.len(), 2);
        assert!(listed.contains(&a));
        assert!(listed.contains(&b));
    }

    #[tokio::test]
    async fn unknown_thread_is_not_found() {
        let registry = ThreadRegistry::new(Arc::new(NullSessionStore));

        let err = registry.get_state(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ResearchError::ThreadNotFound(_)));
    }

    #[tokio::test]
    async fn record_turn_appends_history_and_replaces_state() {
        let registry = ThreadRegistry::new(Arc::new(NullSessionStore));
        let thread_id = registry.new_thread(Role::Citizen).await;

        let mut state = LoopState::new("rewritten", Role::Citizen, Vec::new());
        state.final_analysis = "answer".to_string();

        registry.record_turn(thread_id, "original question", state).await.unwrap();

        let stored = registry.get_state(thread_id).await.unwrap();
        assert_eq!(stored.chat_history.len(), 2);
        assert_eq!(stored.chat_history[0].content, "original question");
        assert_eq!(stored.chat_history[1].content, "answer");
    }

    /// Store stub that remembers saves, to verify snapshot plumbing.
    struct MemoryStore {
        saved: Mutex<Vec<Conversation>>,
    }

    #[async_trait]
    impl SessionStore for MemoryStore {
        async fn save(&self, conversation: &Conversation) -> Result<(), ResearchError> {
            self.saved.lock().unwrap().push(conversation.clone());
            Ok(())
        }

        async fn load(&self, thread_id: Uuid) -> Result<Option<Conversation>, ResearchError> {
            Ok(self
                .saved
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|c| c.thread_id == thread_id)
                .cloned())
        }
    }

    #[tokio::test]
    async fn snapshots_flow_through_the_session_store() {
        let store = Arc::new(MemoryStore {
            saved: Mutex::new(Vec::new()),
        });
        let registry = ThreadRegistry::new(store.clone());
        let thread_id = registry.new_thread(Role::Lawyer).await;

        let mut state = LoopState::new("q", Role::Lawyer, Vec::new());
        state.final_analysis = "a".to_string();
        registry.record_turn(thread_id, "q", state).await.unwrap();

        assert_eq!(store.saved.lock().unwrap().len(), 1);

        // A second registry backed by the same store can resume the thread.
        let resumed = ThreadRegistry::new(store);
        let state = resumed.get_state(thread_id).await.unwrap();
        assert_eq!(state.chat_history.len(), 2);
    }
}
