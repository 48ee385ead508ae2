//! Single-turn research command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use uuid::Uuid;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Role, SourceCitation};
use crate::infrastructure::session::JsonFileSessionStore;
use crate::infrastructure::{build_research_stack, ResearchStack};
use crate::services::{TurnOutcome, TurnRequest};

#[derive(Args, Debug)]
pub struct AskArgs {
    /// Legal question to research
    pub query: String,

    /// Audience framing (citizen or lawyer)
    #[arg(short, long, default_value = "citizen")]
    pub role: Role,

    /// Continue an existing thread instead of starting a new one
    #[arg(short, long)]
    pub thread: Option<Uuid>,

    /// Config file path (default: hierarchical .lara/ discovery)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, serde::Serialize)]
pub struct AskOutput {
    pub thread_id: String,
    pub role: String,
    pub query: String,
    pub rewritten_query: String,
    pub iterations: u32,
    pub research_complete: bool,
    pub sources: Vec<SourceCitation>,
    pub analysis: String,
}

impl AskOutput {
    pub fn from_outcome(thread_id: Uuid, query: &str, outcome: &TurnOutcome) -> Self {
        Self {
            thread_id: thread_id.to_string(),
            role: outcome.state.role.to_string(),
            query: query.to_string(),
            rewritten_query: outcome.state.query.clone(),
            iterations: outcome.iterations,
            research_complete: outcome.state.research_complete,
            sources: outcome.state.sources.clone(),
            analysis: outcome.state.final_analysis.clone(),
        }
    }
}

impl CommandOutput for AskOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.analysis.clone()];

        if !self.sources.is_empty() {
            lines.push(String::new());
            lines.push(format!("Consulted {} source(s):", self.sources.len()));
            for source in &self.sources {
                lines.push(format!("  - {}", describe_citation(source)));
            }
        }

        lines.push(String::new());
        lines.push(format!(
            "Thread {} ({} iteration(s), research {})",
            self.thread_id,
            self.iterations,
            if self.research_complete {
                "complete"
            } else {
                "capped"
            }
        ));

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

fn describe_citation(citation: &SourceCitation) -> String {
    match citation {
        SourceCitation::Document { metadata } => {
            let detail = serde_json::to_string(metadata).unwrap_or_default();
            format!("corpus document {detail}")
        }
        SourceCitation::Web { url, title } => {
            if title.is_empty() {
                url.clone()
            } else {
                format!("{title} <{url}>")
            }
        }
    }
}

/// Resolve the target thread and run one turn against it.
pub async fn run_turn(
    stack: &ResearchStack,
    thread: Option<Uuid>,
    role: Role,
    query: &str,
) -> Result<(Uuid, TurnOutcome)> {
    let (thread_id, role, chat_history) = match thread {
        Some(id) => match stack.registry.get_state(id).await {
            Ok(state) => (id, state.role, state.chat_history),
            // An unknown thread degrades to a fresh one rather than failing
            // the turn.
            Err(crate::domain::errors::ResearchError::ThreadNotFound(_)) => {
                tracing::warn!(thread_id = %id, "thread not found, starting a new one");
                (stack.registry.new_thread(role).await, role, Vec::new())
            }
            Err(err) => return Err(err).context("Failed to resume thread"),
        },
        None => (stack.registry.new_thread(role).await, role, Vec::new()),
    };

    let outcome = stack
        .research_loop
        .run(TurnRequest {
            query: query.to_string(),
            role,
            chat_history,
        })
        .await
        .context("Research loop failed")?;

    stack
        .registry
        .record_turn(thread_id, query, outcome.state.clone())
        .await
        .context("Failed to record turn")?;

    Ok((thread_id, outcome))
}

pub async fn execute(args: AskArgs, json_mode: bool) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;
    let store = Arc::new(JsonFileSessionStore::new(super::THREADS_DIR));
    let stack = build_research_stack(&config, store)?;

    let (thread_id, outcome) = run_turn(&stack, args.thread, args.role, &args.query).await?;

    output(
        &AskOutput::from_outcome(thread_id, &args.query, &outcome),
        json_mode,
    );
    Ok(())
}
