//! Turn lifecycle types for Glimora.
//!
//! A "turn" is one user-message-in, assistant-message-out cycle. These
//! types model the per-turn mode selection, the state machine phases, and
//! the terminal outcome reported back to the UI.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Mode toggles captured per chat view.
///
/// `web_search` and `ai_summarize` persist across turns; `attachment` is
/// cleared after being consumed by one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeToggles {
    pub web_search: bool,
    pub ai_summarize: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<PathBuf>,
}

/// The strategy selected for a single turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnMode {
    Plain,
    FileAugmented,
    WebSearch,
    WebSearchSummarize,
}

impl TurnMode {
    /// Select the mode for a turn from the toggle state captured at begin.
    ///
    /// Precedence: an attached file always wins over web-search; the
    /// summarize variant is chosen by its own boolean, not a chain.
    pub fn select(toggles: &ModeToggles) -> Self {
        if toggles.attachment.is_some() {
            TurnMode::FileAugmented
        } else if toggles.web_search && toggles.ai_summarize {
            TurnMode::WebSearchSummarize
        } else if toggles.web_search {
            TurnMode::WebSearch
        } else {
            TurnMode::Plain
        }
    }

    /// The mode to retry with when this mode's dispatch fails.
    ///
    /// Only the web-search modes fall back (to Plain, so the user still
    /// gets an answer when the search collaborator is down). Plain and
    /// FileAugmented have nowhere to go.
    pub fn fallback(&self) -> Option<Self> {
        match self {
            TurnMode::WebSearch | TurnMode::WebSearchSummarize => Some(TurnMode::Plain),
            TurnMode::Plain | TurnMode::FileAugmented => None,
        }
    }
}

impl fmt::Display for TurnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnMode::Plain => write!(f, "plain"),
            TurnMode::FileAugmented => write!(f, "file_augmented"),
            TurnMode::WebSearch => write!(f, "web_search"),
            TurnMode::WebSearchSummarize => write!(f, "web_search_summarize"),
        }
    }
}

/// Phase of a turn's state machine.
///
/// `Idle -> Dispatching -> Streaming -> {Completed | Cancelled | Failed}`,
/// with `Fallback` as a second dispatch pass reachable only from a failed
/// web-search dispatch. Terminal phases are never left; a new turn always
/// starts a fresh machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    Idle,
    Dispatching,
    Fallback,
    Streaming,
    Completed,
    Cancelled,
    Failed,
}

impl TurnPhase {
    /// Whether this phase is terminal (no transitions leave it).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TurnPhase::Completed | TurnPhase::Cancelled | TurnPhase::Failed
        )
    }
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnPhase::Idle => write!(f, "idle"),
            TurnPhase::Dispatching => write!(f, "dispatching"),
            TurnPhase::Fallback => write!(f, "fallback"),
            TurnPhase::Streaming => write!(f, "streaming"),
            TurnPhase::Completed => write!(f, "completed"),
            TurnPhase::Cancelled => write!(f, "cancelled"),
            TurnPhase::Failed => write!(f, "failed"),
        }
    }
}

/// A turn failure as surfaced to the UI.
///
/// `user_message` is what replaces the trailing assistant message's
/// content; `detail` is the raw technical error, kept out of the
/// transcript and shown only on request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnFailure {
    pub user_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

/// Terminal outcome of one driven turn.
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// The strategy's fragment stream ran to completion.
    Completed,
    /// The turn was cancelled; accumulated text is retained as-is.
    Cancelled,
    /// The turn failed; the trailing assistant message holds
    /// `failure.user_message`.
    Failed(TurnFailure),
}

impl TurnOutcome {
    /// The terminal phase this outcome corresponds to.
    pub fn phase(&self) -> TurnPhase {
        match self {
            TurnOutcome::Completed => TurnPhase::Completed,
            TurnOutcome::Cancelled => TurnPhase::Cancelled,
            TurnOutcome::Failed(_) => TurnPhase::Failed,
        }
    }
}
