//! Chat session types for Glimora.
//!
//! A `ChatSession` is an ordered message transcript with a title and
//! creation timestamp. The message list is append-only except for in-place
//! replacement of the trailing assistant message during streaming and
//! whole-session deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::Message;

/// Maximum characters of the first user message used as a derived title.
pub const TITLE_MAX_CHARS: usize = 40;

/// A chat session: a titled, timestamped message transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    /// Create an empty session with a placeholder title.
    ///
    /// The title is replaced with a derived one when the first user
    /// message arrives, unless the user renames it first.
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            title: "New Chat...".to_string(),
            messages: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Derive a session title from the first user message.
    ///
    /// Truncates on a character boundary and appends an ellipsis when the
    /// message is longer than [`TITLE_MAX_CHARS`].
    pub fn derive_title(first_user_content: &str) -> String {
        let trimmed = first_user_content.trim();
        if trimmed.chars().count() <= TITLE_MAX_CHARS {
            trimmed.to_string()
        } else {
            let truncated: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();
            format!("{}...", truncated.trim_end())
        }
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    #[test]
    fn test_new_session_is_empty() {
        let session = ChatSession::new();
        assert!(session.messages.is_empty());
        assert_eq!(session.title, "New Chat...");
    }

    #[test]
    fn test_derive_title_short() {
        assert_eq!(ChatSession::derive_title("best thrillers"), "best thrillers");
    }

    #[test]
    fn test_derive_title_trims_whitespace() {
        assert_eq!(ChatSession::derive_title("  hi there  "), "hi there");
    }

    #[test]
    fn test_derive_title_truncates_long_input() {
        let long = "a".repeat(100);
        let title = ChatSession::derive_title(&long);
        assert!(title.ends_with("..."));
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS + 3);
    }

    #[test]
    fn test_derive_title_multibyte_boundary() {
        let long = "日本語のとても長いタイトルを持つメッセージですがこれは切り詰められるはずですもっと長くします";
        let title = ChatSession::derive_title(long);
        assert!(title.ends_with("..."));
        // Must not panic on a char boundary.
        assert!(title.chars().count() <= TITLE_MAX_CHARS + 3);
    }

    #[test]
    fn test_session_serde_roundtrip() {
        let mut session = ChatSession::new();
        session.messages.push(Message::user("hello"));
        session.messages.push(Message::assistant("hi"));

        let json = serde_json::to_string(&session).unwrap();
        let parsed: ChatSession = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, session.id);
        assert_eq!(parsed.messages.len(), 2);
        assert_eq!(parsed.messages[0].content, "hello");
    }
}
