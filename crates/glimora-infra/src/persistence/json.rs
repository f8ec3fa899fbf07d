//! JsonSessionPersistence -- concrete [`SessionPersistence`] implementation.
//!
//! Stores the whole session list as one pretty-printed JSON file
//! (`sessions.json` in the data directory). The file is rewritten
//! wholesale on every save; session lists are small enough that partial
//! writes are not worth the complexity.
//!
//! Load is best-effort per the trait contract: a missing file is the
//! empty list, and a corrupt file logs a warning and also yields the
//! empty list rather than blocking startup.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use glimora_core::client::SessionPersistence;
use glimora_types::error::PersistenceError;
use glimora_types::session::ChatSession;

/// JSON-file session persistence.
pub struct JsonSessionPersistence {
    path: PathBuf,
}

impl JsonSessionPersistence {
    /// Persist under `{data_dir}/sessions.json`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("sessions.json"),
        }
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionPersistence for JsonSessionPersistence {
    async fn load(&self) -> Vec<ChatSession> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("no session file at {}, starting empty", self.path.display());
                return Vec::new();
            }
            Err(err) => {
                warn!("failed to read {}: {err}, starting empty", self.path.display());
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(sessions) => sessions,
            Err(err) => {
                warn!("failed to parse {}: {err}, starting empty", self.path.display());
                Vec::new()
            }
        }
    }

    async fn save(&self, sessions: &[ChatSession]) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(sessions)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PersistenceError::Io(e.to_string()))?;
        }
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| PersistenceError::Io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glimora_types::message::Message;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_missing_file_returns_empty() {
        let tmp = TempDir::new().unwrap();
        let store = JsonSessionPersistence::new(tmp.path());
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupt_file_returns_empty() {
        let tmp = TempDir::new().unwrap();
        let store = JsonSessionPersistence::new(tmp.path());
        tokio::fs::write(store.path(), "this is not [ valid json !!!")
            .await
            .unwrap();

        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let tmp = TempDir::new().unwrap();
        let store = JsonSessionPersistence::new(tmp.path());

        let mut session = ChatSession::new();
        session.title = "Movie night".to_string();
        session.messages.push(Message::user("best thriller 2024"));
        session.messages.push(Message::assistant("Try Rebel Ridge."));

        store.save(std::slice::from_ref(&session)).await.unwrap();
        let loaded = store.load().await;

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, session.id);
        assert_eq!(loaded[0].title, "Movie night");
        assert_eq!(loaded[0].messages.len(), 2);
        assert_eq!(loaded[0].messages[1].content, "Try Rebel Ridge.");
    }

    #[tokio::test]
    async fn test_save_creates_missing_data_dir() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("deeper").join("glimora");
        let store = JsonSessionPersistence::new(&nested);

        store.save(&[ChatSession::new()]).await.unwrap();
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_snapshot() {
        let tmp = TempDir::new().unwrap();
        let store = JsonSessionPersistence::new(tmp.path());

        store
            .save(&[ChatSession::new(), ChatSession::new()])
            .await
            .unwrap();
        store.save(&[ChatSession::new()]).await.unwrap();

        assert_eq!(store.load().await.len(), 1);
    }
}
