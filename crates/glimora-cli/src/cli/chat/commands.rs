//! Slash command parsing and help text for the chat loop.
//!
//! Commands start with `/` and provide in-chat controls for mode toggles,
//! file attachment, and session management.

use std::path::PathBuf;

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Toggle web search for subsequent turns.
    Web,
    /// Toggle AI summarization of web results.
    Summarize,
    /// Stage a file for the next turn.
    Attach(PathBuf),
    /// Start a new session.
    New,
    /// List sessions in this store.
    Sessions,
    /// Switch to the n-th listed session (1-based).
    Switch(usize),
    /// Rename the active session.
    Rename(String),
    /// Delete the active session.
    Delete,
    /// Show conversation history for the active session.
    History,
    /// Exit the chat.
    Exit,
    /// Unknown command or bad arguments.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
    let cmd = parts[0].to_lowercase();
    let arg = parts.get(1).map(|s| s.trim()).filter(|s| !s.is_empty());

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/web" => Some(ChatCommand::Web),
        "/summarize" | "/sum" => Some(ChatCommand::Summarize),
        "/attach" => match arg {
            Some(path) => Some(ChatCommand::Attach(PathBuf::from(path))),
            None => Some(ChatCommand::Unknown(
                "/attach requires a file path".to_string(),
            )),
        },
        "/new" => Some(ChatCommand::New),
        "/sessions" | "/ls" => Some(ChatCommand::Sessions),
        "/switch" => match arg.and_then(|n| n.parse().ok()) {
            Some(n) => Some(ChatCommand::Switch(n)),
            None => Some(ChatCommand::Unknown(
                "/switch requires a session number".to_string(),
            )),
        },
        "/rename" => match arg {
            Some(title) => Some(ChatCommand::Rename(title.to_string())),
            None => Some(ChatCommand::Unknown(
                "/rename requires a title".to_string(),
            )),
        },
        "/delete" | "/del" => Some(ChatCommand::Delete),
        "/history" | "/hist" => Some(ChatCommand::History),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!(
        "  {}       {}",
        style("/web").cyan(),
        "Toggle web search for the next turns"
    );
    println!(
        "  {} {}",
        style("/summarize").cyan(),
        "Toggle AI summary of web results"
    );
    println!(
        "  {}    {}",
        style("/attach").cyan(),
        "Attach a PDF to the next message"
    );
    println!(
        "  {}       {}",
        style("/new").cyan(),
        "Start a new session"
    );
    println!(
        "  {}  {}",
        style("/sessions").cyan(),
        "List sessions"
    );
    println!(
        "  {}    {}",
        style("/switch").cyan(),
        "Switch to a listed session by number"
    );
    println!(
        "  {}    {}",
        style("/rename").cyan(),
        "Rename the current session"
    );
    println!(
        "  {}    {}",
        style("/delete").cyan(),
        "Delete the current session"
    );
    println!(
        "  {}   {}",
        style("/history").cyan(),
        "Show conversation history"
    );
    println!(
        "  {}      {}",
        style("/exit").cyan(),
        "End the chat"
    );
    println!();
    println!(
        "  {}",
        style("Ctrl+C cancels a streaming response, Ctrl+D exits").dim()
    );
    println!();
}
