//! Conversation threads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::Role;
use super::state::LoopState;

/// A conversation thread: an opaque identifier plus the state left behind by
/// its most recent loop invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub thread_id: Uuid,
    pub state: LoopState,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a fresh thread for a role with no history.
    pub fn new(role: Role) -> Self {
        Self {
            thread_id: Uuid::new_v4(),
            state: LoopState::new(String::new(), role, Vec::new()),
            created_at: Utc::now(),
        }
    }
}
