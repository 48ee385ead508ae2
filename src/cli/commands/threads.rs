//! Saved-thread listing command.

use anyhow::Result;
use clap::Args;
use comfy_table::{presets, Cell, ContentArrangement, Table};

use crate::cli::output::{output, truncate, CommandOutput};
use crate::domain::models::Conversation;
use crate::infrastructure::session::JsonFileSessionStore;

#[derive(Args, Debug)]
pub struct ThreadsArgs {
    /// Maximum number of threads to display
    #[arg(short, long, default_value = "50")]
    pub limit: usize,
}

#[derive(Debug, serde::Serialize)]
pub struct ThreadSummary {
    pub thread_id: String,
    pub role: String,
    pub created_at: String,
    pub turns: usize,
    pub last_query: String,
}

impl From<&Conversation> for ThreadSummary {
    fn from(conversation: &Conversation) -> Self {
        // A turn is one user/assistant message pair.
        let turns = conversation.state.chat_history.len() / 2;
        let last_query = conversation
            .state
            .chat_history
            .iter()
            .rev()
            .find(|m| m.role == crate::domain::models::MessageRole::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();

        Self {
            thread_id: conversation.thread_id.to_string(),
            role: conversation.state.role.to_string(),
            created_at: conversation.created_at.to_rfc3339(),
            turns,
            last_query,
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ThreadListOutput {
    pub threads: Vec<ThreadSummary>,
    pub total: usize,
}

impl CommandOutput for ThreadListOutput {
    fn to_human(&self) -> String {
        if self.threads.is_empty() {
            return "No saved threads.".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_BORDERS_ONLY)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["THREAD", "ROLE", "CREATED", "TURNS", "LAST QUERY"]);

        for thread in &self.threads {
            table.add_row(vec![
                Cell::new(&thread.thread_id[..8]),
                Cell::new(&thread.role),
                Cell::new(&thread.created_at),
                Cell::new(thread.turns),
                Cell::new(truncate(&thread.last_query, 40)),
            ]);
        }

        format!("{} thread(s):\n{table}", self.total)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Build the listing from newest-first conversations. `total` reports every
/// saved thread even when `limit` truncates the display.
fn summarize(conversations: &[Conversation], limit: usize) -> ThreadListOutput {
    let threads: Vec<ThreadSummary> = conversations
        .iter()
        .rev()
        .take(limit)
        .map(ThreadSummary::from)
        .collect();

    ThreadListOutput {
        threads,
        total: conversations.len(),
    }
}

pub async fn execute(args: ThreadsArgs, json_mode: bool) -> Result<()> {
    let store = JsonFileSessionStore::new(super::THREADS_DIR);
    let conversations = store.list_all().await?;

    output(&summarize(&conversations, args.limit), json_mode);
    Ok(())
}
