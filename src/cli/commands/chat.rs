//! Interactive multi-turn research session.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use uuid::Uuid;

use crate::cli::commands::ask::{run_turn, AskOutput};
use crate::cli::output::output;
use crate::domain::models::Role;
use crate::infrastructure::build_research_stack;
use crate::infrastructure::session::JsonFileSessionStore;

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Audience framing (citizen or lawyer)
    #[arg(short, long, default_value = "citizen")]
    pub role: Role,

    /// Resume an existing thread
    #[arg(short, long)]
    pub thread: Option<Uuid>,

    /// Config file path (default: hierarchical .lara/ discovery)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub async fn execute(args: ChatArgs, json_mode: bool) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;
    let store = Arc::new(JsonFileSessionStore::new(super::THREADS_DIR));
    let stack = build_research_stack(&config, store)?;

    let thread_id = match args.thread {
        Some(id) => match stack.registry.get_state(id).await {
            Ok(_) => id,
            Err(crate::domain::errors::ResearchError::ThreadNotFound(_)) => {
                tracing::warn!(thread_id = %id, "thread not found, starting a new one");
                stack.registry.new_thread(args.role).await
            }
            Err(err) => return Err(err).context("Failed to resume thread"),
        },
        None => stack.registry.new_thread(args.role).await,
    };

    if !json_mode {
        println!("Thread {thread_id}. Ask a question, or type 'exit' to leave.");
    }

    let stdin = std::io::stdin();
    loop {
        if !json_mode {
            print!("> ");
            std::io::stdout().flush()?;
        }

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }

        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("exit") || query.eq_ignore_ascii_case("quit") {
            break;
        }

        match run_turn(&stack, Some(thread_id), args.role, query).await {
            Ok((_, outcome)) => {
                output(&AskOutput::from_outcome(thread_id, query, &outcome), json_mode);
            }
            // Keep the session alive across transient provider failures.
            Err(err) => eprintln!("Error: {err:#}"),
        }
    }

    Ok(())
}
