//! Collaborator trait definitions.
//!
//! These are the four external contracts the core consumes: language
//! model, web search, text extraction, and session persistence. Uses
//! native async fn in traits (RPITIT, Rust 2024 edition) for unary calls
//! and `Pin<Box<dyn Stream>>` for the streaming method so it stays
//! object-safe.
//!
//! Implementations live in glimora-infra (e.g., `OpenRouterClient`,
//! `TavilyClient`).

use std::path::Path;
use std::pin::Pin;

use futures_util::Stream;

use glimora_types::error::{ExtractionError, ModelError, PersistenceError, SearchError};
use glimora_types::message::Message;
use glimora_types::search::SearchResponse;
use glimora_types::session::ChatSession;

/// Raw byte chunks of a streaming model response.
///
/// Chunk boundaries carry no meaning; a multi-byte character may be split
/// across two chunks. The stream terminates when the provider signals
/// end-of-stream.
pub type ModelByteStream =
    Pin<Box<dyn Stream<Item = Result<Vec<u8>, ModelError>> + Send + 'static>>;

/// Language-model collaborator.
///
/// The core only consumes streaming mode; credential checks happen before
/// dispatch so a missing key surfaces as `ModelError::MissingCredentials`
/// on the first stream item.
pub trait ChatModelClient: Send + Sync {
    /// Send a streaming chat completion request.
    ///
    /// Returns a boxed stream of raw content bytes. Dropping the stream
    /// releases the underlying connection.
    fn stream_chat(&self, messages: Vec<Message>) -> ModelByteStream;
}

/// Web-search collaborator: one query in, one complete response out.
pub trait SearchClient: Send + Sync {
    fn search(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<SearchResponse, SearchError>> + Send;
}

/// Text-extraction collaborator (PDF only in current scope).
///
/// Extraction is all-or-nothing; there is no partial or streaming
/// extraction, and the call cannot be interrupted once started.
pub trait TextExtractor: Send + Sync {
    fn extract(
        &self,
        path: &Path,
    ) -> impl std::future::Future<Output = Result<String, ExtractionError>> + Send;
}

/// Session persistence collaborator.
///
/// `load` is best-effort by contract: a missing or corrupt blob yields an
/// empty list, never an error. `save` is last-write-wins with no
/// transactional guarantees.
pub trait SessionPersistence: Send + Sync {
    fn load(&self) -> impl std::future::Future<Output = Vec<ChatSession>> + Send;

    fn save(
        &self,
        sessions: &[ChatSession],
    ) -> impl std::future::Future<Output = Result<(), PersistenceError>> + Send;
}
