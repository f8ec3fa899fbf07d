//! Session management CLI commands: list and delete.
//!
//! Session browsing with a rich table and deletion by unambiguous id
//! prefix.

use anyhow::{bail, Result};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use uuid::Uuid;

use glimora_types::session::ChatSession;

use crate::state::AppState;

/// List saved sessions with title, message count, creation time, and id.
///
/// # Examples
///
/// ```bash
/// glimora sessions
/// ```
pub async fn list_sessions(state: &AppState) -> Result<()> {
    let store = state.open_store().await;
    let sessions = store.list_sessions();

    if sessions.is_empty() {
        println!();
        println!(
            "  {} No saved sessions. Start one with: {}",
            style("i").blue().bold(),
            style("glimora chat").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Title").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
        Cell::new("Created").fg(Color::White),
        Cell::new("Id").fg(Color::White),
    ]);

    for session in sessions {
        let created = session.created_at.format("%Y-%m-%d %H:%M").to_string();
        let id = session.id.to_string();

        table.add_row(vec![
            Cell::new(&session.title).fg(Color::Cyan),
            Cell::new(session.messages.len().to_string()).fg(Color::White),
            Cell::new(created).fg(Color::DarkGrey),
            Cell::new(&id[..8]).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} session{}",
        style(sessions.len()).bold(),
        if sessions.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Delete a session identified by an unambiguous id prefix.
///
/// # Examples
///
/// ```bash
/// glimora delete 0198c2f1
/// ```
pub async fn delete_session(state: &AppState, id_prefix: &str) -> Result<()> {
    let mut store = state.open_store().await;

    let matches = matching_ids(store.list_sessions(), id_prefix);
    let id = match matches.as_slice() {
        [] => bail!("no session id starts with '{id_prefix}'"),
        [id] => *id,
        _ => bail!(
            "'{id_prefix}' matches {} sessions, use a longer prefix",
            matches.len()
        ),
    };

    let title = store
        .list_sessions()
        .iter()
        .find(|s| s.id == id)
        .map(|s| s.title.clone())
        .unwrap_or_default();

    // Cannot fail: the id came from the list we just searched.
    store.delete_session(id).await?;

    println!(
        "  {} Session '{}' deleted.",
        style("x").red().bold(),
        title
    );

    Ok(())
}

/// Ids whose string form starts with the given prefix (case-insensitive).
fn matching_ids(sessions: &[ChatSession], prefix: &str) -> Vec<Uuid> {
    let prefix = prefix.to_lowercase();
    sessions
        .iter()
        .filter(|s| s.id.to_string().starts_with(&prefix))
        .map(|s| s.id)
        .collect()
}
