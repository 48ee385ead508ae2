//! Lara CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lara::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Ask(args) => lara::cli::commands::ask::execute(args, cli.json).await,
        Commands::Threads(args) => lara::cli::commands::threads::execute(args, cli.json).await,
        Commands::Chat(args) => lara::cli::commands::chat::execute(args, cli.json).await,
    };

    if let Err(err) = result {
        lara::cli::handle_error(err, cli.json);
    }
}
