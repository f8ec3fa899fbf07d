//! Main chat loop orchestration.
//!
//! Coordinates the conversation lifecycle: welcome banner, input loop,
//! slash commands, turn driving with streamed output, cancellation, and
//! session switching. The turn future and the input reader run
//! concurrently on the same task so Ctrl+C during streaming cancels the
//! turn instead of killing the process.

use std::cell::Cell;
use std::io::Write;
use std::time::{Duration, Instant};

use console::style;

use glimora_core::session::ChatSessionStore;
use glimora_infra::persistence::JsonSessionPersistence;
use glimora_types::error::{StoreError, SubmitError};
use glimora_types::message::MessageRole;
use glimora_types::turn::{ModeToggles, TurnOutcome};

use crate::state::{AppState, ConcreteController};

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

type Store = ChatSessionStore<JsonSessionPersistence>;

/// Run the interactive chat loop.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let mut store = state.open_store().await;
    let controller = state.controller();
    let renderer = ChatRenderer::new();

    print_welcome_banner(&state.config.model, store.list_sessions().len());

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    let mut toggles = ModeToggles::default();

    loop {
        let event = chat_input.read_line().await;
        match event {
            InputEvent::Eof => {
                println!("\n  {}", style("Bye.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!(
                    "\n  {}",
                    style("Nothing to cancel. Ctrl+D to exit.").dim()
                );
                continue;
            }
            InputEvent::Message(text) => {
                if text.is_empty() {
                    continue;
                }

                if let Some(cmd) = commands::parse(&text) {
                    if handle_command(cmd, &mut store, &mut toggles, &renderer).await? {
                        break;
                    }
                    continue;
                }

                let exit = run_turn(
                    &controller,
                    &mut store,
                    &mut chat_input,
                    &renderer,
                    &mut toggles,
                    &text,
                )
                .await?;
                if exit {
                    println!("\n  {}", style("Bye.").dim());
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Execute a slash command. Returns `true` when the loop should exit.
async fn handle_command(
    cmd: ChatCommand,
    store: &mut Store,
    toggles: &mut ModeToggles,
    renderer: &ChatRenderer,
) -> anyhow::Result<bool> {
    match cmd {
        ChatCommand::Help => commands::print_help(),
        ChatCommand::Exit => {
            println!("\n  {}", style("Bye.").dim());
            return Ok(true);
        }
        ChatCommand::Web => {
            toggles.web_search = !toggles.web_search;
            print_toggle("Web search", toggles.web_search);
        }
        ChatCommand::Summarize => {
            toggles.ai_summarize = !toggles.ai_summarize;
            print_toggle("AI summary", toggles.ai_summarize);
            if toggles.ai_summarize && !toggles.web_search {
                println!(
                    "  {}",
                    style("AI summary only applies when /web is also on.").dim()
                );
            }
        }
        ChatCommand::Attach(path) => {
            if path.exists() {
                println!(
                    "\n  {} Attached {} for the next message.\n",
                    style("*").cyan().bold(),
                    style(path.display()).yellow()
                );
                toggles.attachment = Some(path);
            } else {
                println!(
                    "\n  {} No such file: {}\n",
                    style("!").yellow().bold(),
                    path.display()
                );
            }
        }
        ChatCommand::New => {
            store.create_session();
            println!("\n  {} Started a new chat.\n", style("*").cyan().bold());
        }
        ChatCommand::Sessions => {
            let sessions = store.list_sessions();
            if sessions.is_empty() {
                println!("\n  {}\n", style("No sessions yet.").dim());
                return Ok(false);
            }
            println!();
            let active = store.active_id();
            for (i, session) in sessions.iter().enumerate() {
                let marker = if active == Some(session.id) { "*" } else { " " };
                println!(
                    "  {} {} {} {}",
                    style(format!("{:>2}.", i + 1)).bold(),
                    marker,
                    style(&session.title).cyan(),
                    style(format!("({} messages)", session.messages.len())).dim()
                );
            }
            println!();
        }
        ChatCommand::Switch(n) => {
            let id = n
                .checked_sub(1)
                .and_then(|i| store.list_sessions().get(i))
                .map(|s| s.id);
            match id {
                Some(id) => {
                    // The id came from the list, select cannot fail.
                    let _ = store.select_session(id);
                    let title = store
                        .active_session()
                        .map(|s| s.title.clone())
                        .unwrap_or_default();
                    println!(
                        "\n  {} Switched to '{}'.\n",
                        style("*").cyan().bold(),
                        style(title).cyan()
                    );
                }
                None => println!(
                    "\n  {} No session {n}. See /sessions.\n",
                    style("!").yellow().bold()
                ),
            }
        }
        ChatCommand::Rename(title) => match store.active_id() {
            Some(id) => {
                match store.rename_session(id, &title).await {
                    Ok(()) => println!(
                        "\n  {} Renamed to '{}'.\n",
                        style("*").cyan().bold(),
                        style(title.trim()).cyan()
                    ),
                    Err(StoreError::UnknownSession) => {}
                }
            }
            None => println!(
                "\n  {} No active session to rename.\n",
                style("!").yellow().bold()
            ),
        },
        ChatCommand::Delete => match store.active_id() {
            Some(id) => {
                match store.delete_session(id).await {
                    Ok(()) => println!(
                        "\n  {} Session deleted.\n",
                        style("x").red().bold()
                    ),
                    Err(StoreError::UnknownSession) => {}
                }
            }
            None => println!(
                "\n  {} No active session to delete.\n",
                style("!").yellow().bold()
            ),
        },
        ChatCommand::History => match store.active_session() {
            Some(session) => {
                println!();
                for msg in &session.messages {
                    match msg.role {
                        MessageRole::User => {
                            println!("  {} {}", style("You >").green().bold(), msg.content);
                        }
                        MessageRole::Assistant => {
                            let rendered = renderer.render_final(&msg.content);
                            println!(
                                "  {} {}",
                                style("Glimora >").cyan().bold(),
                                rendered.trim()
                            );
                        }
                        MessageRole::System => {}
                    }
                    println!();
                }
            }
            None => println!(
                "\n  {} No active session. Send a message to start one.\n",
                style("!").yellow().bold()
            ),
        },
        ChatCommand::Unknown(detail) => {
            println!(
                "\n  {} {}. Type /help for available commands.\n",
                style("?").yellow().bold(),
                style(detail).dim()
            );
        }
    }

    Ok(false)
}

/// Drive one turn while watching the input for cancellation.
///
/// Returns `true` when the user hit Ctrl+D during streaming and the loop
/// should exit after the turn settles.
async fn run_turn(
    controller: &ConcreteController,
    store: &mut Store,
    chat_input: &mut ChatInput,
    renderer: &ChatRenderer,
    toggles: &mut ModeToggles,
    text: &str,
) -> anyhow::Result<bool> {
    let prepared = match controller.begin(store, text, toggles) {
        Ok(prepared) => prepared,
        Err(SubmitError::EmptyInput) => {
            println!("\n  {}\n", style("Nothing to send.").dim());
            return Ok(false);
        }
    };

    // The attachment is consumed by exactly one turn.
    toggles.attachment = None;

    let handle = prepared.handle();
    let mode = prepared.mode();

    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_style(
        indicatif::ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let started = Instant::now();
    let first = Cell::new(true);

    let spinner_ref = &spinner;
    let on_fragment = |fragment: &str| {
        if first.get() {
            first.set(false);
            spinner_ref.finish_and_clear();
            print!("\n  {} ", style("Glimora >").cyan().bold());
            let _ = std::io::stdout().flush();
        }
        renderer.print_streaming_fragment(fragment);
    };

    let drive = controller.drive(store, prepared, on_fragment);
    tokio::pin!(drive);

    let mut exit_after = false;
    let outcome = loop {
        tokio::select! {
            outcome = &mut drive => break outcome,
            event = chat_input.read_line() => match event {
                InputEvent::Interrupted => handle.cancel(),
                InputEvent::Eof => {
                    handle.cancel();
                    exit_after = true;
                }
                InputEvent::Message(msg) => {
                    if !msg.is_empty() {
                        println!(
                            "\n  {}",
                            style("A response is still streaming. Ctrl+C cancels it.")
                                .yellow()
                        );
                    }
                }
            }
        }
    };

    if first.get() {
        spinner.finish_and_clear();
    }

    let response_ms = started.elapsed().as_millis() as u64;
    match outcome {
        TurnOutcome::Completed => {
            println!();
            renderer.print_turn_footer(&mode.to_string(), response_ms);
            println!();
        }
        TurnOutcome::Cancelled => {
            println!("\n\n  {}\n", style("Cancelled.").yellow());
        }
        TurnOutcome::Failed(failure) => {
            println!();
            eprintln!(
                "\n  {} {}",
                style("!").red().bold(),
                failure.user_message
            );
            if let Some(detail) = &failure.detail {
                eprintln!("  {}", style(detail.to_string()).dim());
            }
            println!();
        }
    }

    Ok(exit_after)
}

fn print_toggle(label: &str, on: bool) {
    let status = if on {
        style("on").green().bold()
    } else {
        style("off").dim()
    };
    println!("\n  {} {label}: {status}\n", style("*").cyan().bold());
}
