//! Per-turn context and cancellation handle.
//!
//! A `TurnContext` exists for exactly one in-flight assistant turn and is
//! destroyed when the turn reaches a terminal state. The message snapshot
//! is captured by value at begin so later session mutation cannot affect
//! the turn; turns are serialized per session anyway, so this is a
//! defensive invariant.

use std::path::PathBuf;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use glimora_types::message::{Message, MessageRole};
use glimora_types::turn::TurnMode;

/// State owned by one in-flight turn.
pub struct TurnContext {
    /// Session this turn belongs to.
    pub session_id: Uuid,
    /// Message log snapshot at turn start, including the new user message
    /// but not the assistant placeholder.
    pub base_messages: Vec<Message>,
    /// Strategy selected from the toggles captured at begin.
    pub mode: TurnMode,
    /// File staged for this turn (FileAugmented only).
    pub attachment: Option<PathBuf>,
    /// Cooperative cancellation signal, checked at each decode-loop
    /// iteration and replay tick.
    pub cancel: CancellationToken,
    /// Everything streamed so far; the trailing assistant message is a
    /// pure projection of this string.
    pub accumulated: String,
}

impl TurnContext {
    /// The user's raw query text for this turn (the newest user message
    /// in the snapshot).
    pub fn user_text(&self) -> &str {
        self.base_messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

/// Cancellation handle for an in-flight turn.
///
/// Cloneable so the UI can hold it while the controller drives the turn.
#[derive(Clone)]
pub struct TurnHandle {
    cancel: CancellationToken,
}

impl TurnHandle {
    /// Signal the turn to stop. Accumulated text is retained; nothing is
    /// rolled back.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// A validated turn, ready to be driven.
///
/// Returned by `TurnController::begin`; consumed by
/// `TurnController::drive`.
pub struct PreparedTurn {
    pub(crate) context: TurnContext,
}

impl PreparedTurn {
    /// A cancellation handle for this turn.
    pub fn handle(&self) -> TurnHandle {
        TurnHandle {
            cancel: self.context.cancel.clone(),
        }
    }

    /// The mode selected for this turn.
    pub fn mode(&self) -> TurnMode {
        self.context.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_with_messages(messages: Vec<Message>) -> TurnContext {
        TurnContext {
            session_id: Uuid::now_v7(),
            base_messages: messages,
            mode: TurnMode::Plain,
            attachment: None,
            cancel: CancellationToken::new(),
            accumulated: String::new(),
        }
    }

    #[test]
    fn test_user_text_finds_newest_user_message() {
        let ctx = context_with_messages(vec![
            Message::user("first question"),
            Message::assistant("first answer"),
            Message::user("second question"),
        ]);
        assert_eq!(ctx.user_text(), "second question");
    }

    #[test]
    fn test_user_text_empty_without_user_messages() {
        let ctx = context_with_messages(vec![Message::system("setup")]);
        assert_eq!(ctx.user_text(), "");
    }

    #[test]
    fn test_handle_cancellation_is_visible_to_context() {
        let ctx = context_with_messages(Vec::new());
        let prepared = PreparedTurn { context: ctx };
        let handle = prepared.handle();

        assert!(!handle.is_cancelled());
        handle.cancel();
        assert!(prepared.context.cancel.is_cancelled());
    }
}
