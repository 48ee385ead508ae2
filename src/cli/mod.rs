//! Command-line interface.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

pub use output::{output, CommandOutput};

#[derive(Parser)]
#[command(name = "lara")]
#[command(about = "Lara - Iterative legal research assistant", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Research a legal question in a single turn
    Ask(commands::ask::AskArgs),

    /// List saved conversation threads
    Threads(commands::threads::ThreadsArgs),

    /// Interactive multi-turn research session
    Chat(commands::chat::ChatArgs),
}

/// Print an error in the selected output mode and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) {
    if json_mode {
        let body = serde_json::json!({ "error": format!("{err:#}") });
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
