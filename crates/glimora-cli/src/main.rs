//! Glimora CLI entry point.
//!
//! Binary name: `glimora`
//!
//! Parses CLI arguments, initializes tracing and application state, then
//! dispatches to the chat REPL or a session management command. Runs on a
//! current-thread runtime: turn processing is cooperative, and the only
//! blocking work (PDF extraction) is offloaded by the extractor itself.

mod cli;
mod state;

use clap::Parser;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,glimora=debug",
        _ => "trace",
    };
    glimora_observe::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let state = AppState::init().await;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => cli::chat::run_chat_loop(&state).await?,
        Commands::Sessions => cli::sessions::list_sessions(&state).await?,
        Commands::Delete { id_prefix } => {
            cli::sessions::delete_session(&state, &id_prefix).await?;
        }
    }

    glimora_observe::shutdown_tracing();
    Ok(())
}
