//! In-memory session store with write-through persistence.
//!
//! Owns the ordered session list (newest first) and the active session's
//! message log. All message-log mutation goes through this store; the
//! turn controller never touches a session directly.
//!
//! Persistence policy: saves happen after structural list changes (rename,
//! delete) and when the controller finishes a turn, not per fragment.
//! Sessions with no messages are never persisted, so an abandoned "new
//! chat" disappears silently.

use tracing::{debug, warn};
use uuid::Uuid;

use glimora_types::error::StoreError;
use glimora_types::message::{Message, MessageRole};
use glimora_types::session::ChatSession;

use crate::client::SessionPersistence;

pub struct ChatSessionStore<P> {
    persistence: P,
    sessions: Vec<ChatSession>,
    active: Option<Uuid>,
}

impl<P: SessionPersistence> ChatSessionStore<P> {
    /// Load persisted sessions and build the store.
    ///
    /// Load is best-effort by collaborator contract; a missing or corrupt
    /// blob yields an empty list. No session is selected initially.
    pub async fn load(persistence: P) -> Self {
        let sessions = persistence.load().await;
        debug!(count = sessions.len(), "loaded chat sessions");
        Self {
            persistence,
            sessions,
            active: None,
        }
    }

    /// All sessions, newest first.
    pub fn list_sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    /// The currently selected session, if any.
    pub fn active_session(&self) -> Option<&ChatSession> {
        let id = self.active?;
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Id of the currently selected session.
    pub fn active_id(&self) -> Option<Uuid> {
        self.active
    }

    /// Create a new empty session, prepend it to the list, and select it.
    ///
    /// The session is not persisted until it has at least one message.
    pub fn create_session(&mut self) -> Uuid {
        let session = ChatSession::new();
        let id = session.id;
        self.sessions.insert(0, session);
        self.active = Some(id);
        debug!(session_id = %id, "created chat session");
        id
    }

    /// Select an existing session as active.
    pub fn select_session(&mut self, id: Uuid) -> Result<(), StoreError> {
        if !self.sessions.iter().any(|s| s.id == id) {
            return Err(StoreError::UnknownSession);
        }
        self.active = Some(id);
        Ok(())
    }

    /// Rename a session and persist the change.
    pub async fn rename_session(&mut self, id: Uuid, title: &str) -> Result<(), StoreError> {
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::UnknownSession)?;
        session.title = title.trim().to_string();
        self.persist().await;
        Ok(())
    }

    /// Delete a session and persist the change.
    ///
    /// If the deleted session was active, the newest remaining session
    /// becomes active (or none, if the list is now empty).
    pub async fn delete_session(&mut self, id: Uuid) -> Result<(), StoreError> {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        if self.sessions.len() == before {
            return Err(StoreError::UnknownSession);
        }
        if self.active == Some(id) {
            self.active = self.sessions.first().map(|s| s.id);
        }
        self.persist().await;
        Ok(())
    }

    /// Append a user message and an empty assistant placeholder to the
    /// active session, creating one lazily if none is selected.
    ///
    /// The first user message of a session also sets its title, unless the
    /// user already renamed it.
    pub fn append_turn_messages(&mut self, user_content: &str) -> Uuid {
        let id = match self.active {
            Some(id) => id,
            None => self.create_session(),
        };
        // The active id always refers to a live session; create_session
        // and delete_session keep it consistent.
        if let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) {
            if session.messages.is_empty() && session.title == "New Chat..." {
                session.title = ChatSession::derive_title(user_content);
            }
            session.messages.push(Message::user(user_content));
            session.messages.push(Message::assistant(""));
        }
        id
    }

    /// Replace the trailing assistant message's content wholesale.
    ///
    /// In-memory only; the projection of the turn accumulator. Ignored
    /// with a warning if the trailing message is not an assistant one.
    pub fn replace_trailing_assistant(&mut self, id: Uuid, content: &str) {
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) else {
            warn!(session_id = %id, "replace on unknown session");
            return;
        };
        match session.messages.last_mut() {
            Some(last) if last.role == MessageRole::Assistant => {
                last.content = content.to_string();
            }
            _ => warn!(session_id = %id, "trailing message is not an assistant message"),
        }
    }

    /// Persist all non-empty sessions, best-effort.
    pub async fn persist(&self) {
        let to_save: Vec<ChatSession> = self
            .sessions
            .iter()
            .filter(|s| !s.messages.is_empty())
            .cloned()
            .collect();
        if let Err(err) = self.persistence.save(&to_save).await {
            warn!(error = %err, "failed to persist chat sessions");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glimora_types::error::PersistenceError;
    use std::sync::{Arc, Mutex};

    /// Records every saved snapshot for assertions.
    #[derive(Clone, Default)]
    struct MemoryPersistence {
        initial: Vec<ChatSession>,
        saves: Arc<Mutex<Vec<Vec<ChatSession>>>>,
    }

    impl SessionPersistence for MemoryPersistence {
        async fn load(&self) -> Vec<ChatSession> {
            self.initial.clone()
        }

        async fn save(&self, sessions: &[ChatSession]) -> Result<(), PersistenceError> {
            self.saves.lock().unwrap().push(sessions.to_vec());
            Ok(())
        }
    }

    async fn empty_store() -> ChatSessionStore<MemoryPersistence> {
        ChatSessionStore::load(MemoryPersistence::default()).await
    }

    #[tokio::test]
    async fn test_load_starts_with_persisted_sessions() {
        let mut session = ChatSession::new();
        session.messages.push(Message::user("hi"));
        let persistence = MemoryPersistence {
            initial: vec![session.clone()],
            saves: Arc::default(),
        };

        let store = ChatSessionStore::load(persistence).await;
        assert_eq!(store.list_sessions().len(), 1);
        assert_eq!(store.list_sessions()[0].id, session.id);
        assert!(store.active_session().is_none());
    }

    #[tokio::test]
    async fn test_create_session_prepends_and_selects() {
        let mut store = empty_store().await;
        let first = store.create_session();
        let second = store.create_session();

        assert_eq!(store.list_sessions()[0].id, second);
        assert_eq!(store.list_sessions()[1].id, first);
        assert_eq!(store.active_id(), Some(second));
    }

    #[tokio::test]
    async fn test_select_unknown_session_fails() {
        let mut store = empty_store().await;
        let result = store.select_session(Uuid::now_v7());
        assert!(matches!(result, Err(StoreError::UnknownSession)));
    }

    #[tokio::test]
    async fn test_append_turn_messages_creates_session_lazily() {
        let mut store = empty_store().await;
        assert!(store.active_session().is_none());

        let id = store.append_turn_messages("I feel nostalgic");
        let session = store.active_session().unwrap();
        assert_eq!(session.id, id);
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[0].role, MessageRole::User);
        assert_eq!(session.messages[0].content, "I feel nostalgic");
        assert_eq!(session.messages[1].role, MessageRole::Assistant);
        assert_eq!(session.messages[1].content, "");
    }

    #[tokio::test]
    async fn test_first_message_derives_title() {
        let mut store = empty_store().await;
        store.create_session();
        store.append_turn_messages("best thriller 2024");
        assert_eq!(store.active_session().unwrap().title, "best thriller 2024");
    }

    #[tokio::test]
    async fn test_explicit_rename_survives_first_message() {
        let mut store = empty_store().await;
        let id = store.create_session();
        store.rename_session(id, "Movie night").await.unwrap();
        store.append_turn_messages("best thriller 2024");
        assert_eq!(store.active_session().unwrap().title, "Movie night");
    }

    #[tokio::test]
    async fn test_replace_trailing_assistant() {
        let mut store = empty_store().await;
        let id = store.append_turn_messages("hi");

        store.replace_trailing_assistant(id, "Hel");
        store.replace_trailing_assistant(id, "Hello");

        let session = store.active_session().unwrap();
        assert_eq!(session.messages[1].content, "Hello");
    }

    #[tokio::test]
    async fn test_empty_sessions_are_never_persisted() {
        let persistence = MemoryPersistence::default();
        let saves = persistence.saves.clone();
        let mut store = ChatSessionStore::load(persistence).await;

        // One empty session, one with content.
        store.create_session();
        let used = store.create_session();
        store.append_turn_messages("hello");
        store.replace_trailing_assistant(used, "hi there");
        store.persist().await;

        let snapshots = saves.lock().unwrap();
        let last = snapshots.last().unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].id, used);
    }

    #[tokio::test]
    async fn test_delete_active_selects_newest_remaining() {
        let mut store = empty_store().await;
        let older = store.create_session();
        let newer = store.create_session();

        store.delete_session(newer).await.unwrap();
        assert_eq!(store.active_id(), Some(older));

        store.delete_session(older).await.unwrap();
        assert!(store.active_id().is_none());
        assert!(store.list_sessions().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_session_fails() {
        let mut store = empty_store().await;
        store.create_session();
        let result = store.delete_session(Uuid::now_v7()).await;
        assert!(matches!(result, Err(StoreError::UnknownSession)));
    }

    #[tokio::test]
    async fn test_rename_persists() {
        let persistence = MemoryPersistence::default();
        let saves = persistence.saves.clone();
        let mut store = ChatSessionStore::load(persistence).await;

        let id = store.append_turn_messages("hi");
        store.rename_session(id, "Greetings").await.unwrap();

        let snapshots = saves.lock().unwrap();
        assert_eq!(snapshots.last().unwrap()[0].title, "Greetings");
    }
}
