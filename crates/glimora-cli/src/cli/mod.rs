//! CLI command definitions and dispatch for the `glimora` binary.

pub mod chat;
pub mod sessions;

use clap::{ArgAction, Parser, Subcommand};

/// Glimora: a terminal chat client for movie and drama talk.
#[derive(Parser)]
#[command(name = "glimora", version, about)]
pub struct Cli {
    /// Suppress all log output except errors
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to OpenTelemetry stdout (local development)
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive chat (default when no subcommand is given)
    Chat,
    /// List saved chat sessions
    #[command(alias = "ls")]
    Sessions,
    /// Delete a saved session by id prefix
    #[command(alias = "rm")]
    Delete {
        /// Unambiguous prefix of the session id
        id_prefix: String,
    },
}
