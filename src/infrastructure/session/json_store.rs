//! JSON file-backed conversation persistence.
//!
//! One file per thread under a root directory, named by thread id. Snapshots
//! are whole-file rewrites, so a partially written file from a crashed process
//! is overwritten by the next save.

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::errors::ResearchError;
use crate::domain::models::Conversation;
use crate::domain::ports::SessionStore;

pub struct JsonFileSessionStore {
    root: PathBuf,
}

impl JsonFileSessionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn thread_path(&self, thread_id: Uuid) -> PathBuf {
        self.root.join(format!("{thread_id}.json"))
    }

    fn io_error(e: impl std::fmt::Display) -> ResearchError {
        ResearchError::Configuration(format!("session store I/O failure: {e}"))
    }

    /// Every persisted conversation, oldest first. Unreadable files are
    /// skipped with a warning rather than failing the listing.
    pub async fn list_all(&self) -> Result<Vec<Conversation>, ResearchError> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Self::io_error(e)),
        };

        let mut conversations = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(Self::io_error)? {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            match tokio::fs::read(&path).await {
                Ok(bytes) => match serde_json::from_slice::<Conversation>(&bytes) {
                    Ok(conversation) => conversations.push(conversation),
                    Err(e) => warn!(path = %path.display(), error = %e, "skipping malformed thread file"),
                },
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable thread file"),
            }
        }

        conversations.sort_by_key(|c| c.created_at);
        Ok(conversations)
    }
}

#[async_trait]
impl SessionStore for JsonFileSessionStore {
    async fn save(&self, conversation: &Conversation) -> Result<(), ResearchError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(Self::io_error)?;

        let body = serde_json::to_vec_pretty(conversation)?;
        let path = self.thread_path(conversation.thread_id);
        tokio::fs::write(&path, body).await.map_err(Self::io_error)?;

        debug!(thread_id = %conversation.thread_id, path = %path.display(), "thread snapshot saved");
        Ok(())
    }

    async fn load(&self, thread_id: Uuid) -> Result<Option<Conversation>, ResearchError> {
        let path = self.thread_path(thread_id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Self::io_error(e)),
        };

        let conversation: Conversation = serde_json::from_slice(&bytes)?;
        Ok(Some(conversation))
    }
}
