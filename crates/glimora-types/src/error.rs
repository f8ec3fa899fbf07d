//! Error types for Glimora.
//!
//! Each collaborator gets its own error enum (model, search, extraction,
//! persistence); `TurnError` is the turn-level taxonomy the controller and
//! strategies operate on. Cancellation is deliberately NOT an error -- it
//! is a terminal turn outcome, not a failure.

use thiserror::Error;

/// Errors from the language-model collaborator.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("missing API key for the model provider")]
    MissingCredentials,

    #[error("model request failed with status {status}")]
    Http { status: u16, body: String },

    #[error("model request error: {0}")]
    Request(String),

    #[error("model stream error: {0}")]
    Stream(String),

    #[error("model response deserialization error: {0}")]
    Deserialization(String),
}

/// Errors from the search collaborator.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("missing API key for the search provider")]
    MissingCredentials,

    #[error("search request failed with status {status}")]
    Http { status: u16, body: String },

    #[error("search request error: {0}")]
    Request(String),

    #[error("search response deserialization error: {0}")]
    Deserialization(String),
}

/// Errors from the text-extraction collaborator.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported file format: '{0}'")]
    UnsupportedFormat(String),

    #[error("could not parse document: {0}")]
    Parse(String),

    #[error("could not read document: {0}")]
    Io(String),
}

/// Errors from the persistence collaborator.
///
/// Only `save` can fail; `load` is best-effort and falls back to an empty
/// session list instead of erroring.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("persistence I/O error: {0}")]
    Io(String),

    #[error("persistence serialization error: {0}")]
    Serialization(String),
}

/// Errors from session store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown session id")]
    UnknownSession,
}

/// Rejection of a turn submission before any state is touched.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("message is empty and no file is attached")]
    EmptyInput,
}

/// Turn-level error taxonomy.
///
/// Strategies and the controller collapse collaborator errors into these
/// four categories. `Network` keeps the raw detail payload for the UI's
/// side-channel; the transcript only ever sees a short fixed string.
#[derive(Debug, Error)]
pub enum TurnError {
    /// Missing credentials for a collaborator; raised before dispatch.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Collaborator unreachable or non-success status.
    #[error("network error: {message}")]
    Network {
        message: String,
        detail: Option<serde_json::Value>,
    },

    /// Malformed stream or response payload.
    #[error("decode error: {0}")]
    Decode(String),

    /// Attached document could not be parsed.
    #[error("extraction error: {0}")]
    Extraction(String),
}

impl From<ModelError> for TurnError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::MissingCredentials => TurnError::Configuration(err.to_string()),
            ModelError::Http { status, body } => TurnError::Network {
                message: format!("model request failed with status {status}"),
                detail: body_detail(&body),
            },
            ModelError::Request(msg) | ModelError::Stream(msg) => TurnError::Network {
                message: msg,
                detail: None,
            },
            ModelError::Deserialization(msg) => TurnError::Decode(msg),
        }
    }
}

impl From<SearchError> for TurnError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::MissingCredentials => TurnError::Configuration(err.to_string()),
            SearchError::Http { status, body } => TurnError::Network {
                message: format!("search request failed with status {status}"),
                detail: body_detail(&body),
            },
            SearchError::Request(msg) => TurnError::Network {
                message: msg,
                detail: None,
            },
            SearchError::Deserialization(msg) => TurnError::Decode(msg),
        }
    }
}

impl From<ExtractionError> for TurnError {
    fn from(err: ExtractionError) -> Self {
        TurnError::Extraction(err.to_string())
    }
}

/// Keep an HTTP error body as a JSON detail payload when it parses,
/// otherwise as a raw string. Empty bodies carry no detail.
fn body_detail(body: &str) -> Option<serde_json::Value> {
    if body.is_empty() {
        return None;
    }
    Some(
        serde_json::from_str(body)
            .unwrap_or_else(|_| serde_json::Value::String(body.to_string())),
    )
}
