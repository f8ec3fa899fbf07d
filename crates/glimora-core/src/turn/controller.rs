//! Turn controller: owns the lifecycle of a single assistant turn.
//!
//! `begin` validates the submission and mutates the session synchronously
//! (user message + assistant placeholder); `drive` runs the selected
//! strategy, applies fragments in order, and settles the turn into exactly
//! one terminal state. One turn per session at a time; the UI boundary
//! rejects submissions while a turn is in flight, the controller does not
//! queue them.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::select;
use tracing::{debug, info, warn};

use glimora_types::error::{SubmitError, TurnError};
use glimora_types::turn::{ModeToggles, TurnFailure, TurnMode, TurnOutcome, TurnPhase};

use tokio_util::sync::CancellationToken;

use crate::client::{ChatModelClient, SearchClient, SessionPersistence, TextExtractor};
use crate::session::ChatSessionStore;
use crate::turn::context::{PreparedTurn, TurnContext};
use crate::turn::strategy;

/// Default delay between replayed fragments in web-search mode.
const DEFAULT_REPLAY_DELAY: Duration = Duration::from_millis(30);

/// Orchestrates turns over the three request-side collaborators.
///
/// Generic over the collaborator traits so tests can substitute mocks.
pub struct TurnController<M, S, X> {
    model: M,
    search: S,
    extractor: X,
    replay_delay: Duration,
}

impl<M, S, X> TurnController<M, S, X>
where
    M: ChatModelClient,
    S: SearchClient,
    X: TextExtractor,
{
    pub fn new(model: M, search: S, extractor: X) -> Self {
        Self {
            model,
            search,
            extractor,
            replay_delay: DEFAULT_REPLAY_DELAY,
        }
    }

    /// Override the replay cadence for web-search mode.
    pub fn with_replay_delay(mut self, delay: Duration) -> Self {
        self.replay_delay = delay;
        self
    }

    /// Start a new turn.
    ///
    /// Validates that the input is non-empty or a file is attached,
    /// appends the user message and an empty assistant placeholder to the
    /// active session (creating one lazily), and captures the message
    /// snapshot plus toggle state into a fresh `TurnContext`.
    pub fn begin<P: SessionPersistence>(
        &self,
        store: &mut ChatSessionStore<P>,
        input: &str,
        toggles: &ModeToggles,
    ) -> Result<PreparedTurn, SubmitError> {
        let trimmed = input.trim();
        if trimmed.is_empty() && toggles.attachment.is_none() {
            return Err(SubmitError::EmptyInput);
        }

        let mode = TurnMode::select(toggles);
        let session_id = store.append_turn_messages(trimmed);

        // Snapshot excludes the assistant placeholder appended above.
        let base_messages = store
            .list_sessions()
            .iter()
            .find(|s| s.id == session_id)
            .map(|s| s.messages[..s.messages.len() - 1].to_vec())
            .unwrap_or_default();

        info!(session_id = %session_id, mode = %mode, "turn started");

        Ok(PreparedTurn {
            context: TurnContext {
                session_id,
                base_messages,
                mode,
                attachment: toggles.attachment.clone(),
                cancel: CancellationToken::new(),
                accumulated: String::new(),
            },
        })
    }

    /// Drive a prepared turn to a terminal state.
    ///
    /// Fragments are applied strictly in production order: each one is
    /// appended to the accumulator, the trailing assistant message is
    /// replaced with the full accumulated string, and `on_fragment` is
    /// called with the new fragment for incremental display. The session
    /// is persisted once, after the terminal state is reached.
    pub async fn drive<P, F>(
        &self,
        store: &mut ChatSessionStore<P>,
        turn: PreparedTurn,
        mut on_fragment: F,
    ) -> TurnOutcome
    where
        P: SessionPersistence,
        F: FnMut(&str),
    {
        let mut ctx = turn.context;
        let outcome = self.run(store, &mut ctx, &mut on_fragment).await;

        info!(
            session_id = %ctx.session_id,
            phase = %outcome.phase(),
            chars = ctx.accumulated.len(),
            "turn finished"
        );
        store.persist().await;
        outcome
    }

    async fn run<P, F>(
        &self,
        store: &mut ChatSessionStore<P>,
        ctx: &mut TurnContext,
        on_fragment: &mut F,
    ) -> TurnOutcome
    where
        P: SessionPersistence,
        F: FnMut(&str),
    {
        debug!(phase = %TurnPhase::Dispatching, mode = %ctx.mode, "turn phase");

        let stream = match self.dispatch_with_fallback(ctx).await {
            Ok(stream) => stream,
            Err(err) => return self.apply_failure(store, ctx, err),
        };

        // Extraction and search dispatch cannot be interrupted mid-await;
        // honor a cancellation requested during dispatch here, before any
        // fragment is consumed.
        if ctx.cancel.is_cancelled() {
            return TurnOutcome::Cancelled;
        }

        debug!(phase = %TurnPhase::Streaming, "turn phase");
        let mut stream = stream;

        loop {
            select! {
                biased;
                _ = ctx.cancel.cancelled() => {
                    debug!(chars = ctx.accumulated.len(), "turn cancelled");
                    return TurnOutcome::Cancelled;
                }
                next = stream.next() => match next {
                    Some(Ok(fragment)) => {
                        ctx.accumulated.push_str(&fragment);
                        store.replace_trailing_assistant(ctx.session_id, &ctx.accumulated);
                        on_fragment(&fragment);
                    }
                    Some(Err(err)) => return self.apply_failure(store, ctx, err),
                    None => return TurnOutcome::Completed,
                }
            }
        }
    }

    /// Dispatch the selected strategy, retrying once on the declared
    /// fallback mode when the primary dispatch fails.
    async fn dispatch_with_fallback(
        &self,
        ctx: &TurnContext,
    ) -> Result<crate::stream::FragmentStream, TurnError> {
        match self.dispatch(ctx.mode, ctx).await {
            Ok(stream) => Ok(stream),
            Err(err) => match ctx.mode.fallback() {
                Some(fallback) => {
                    warn!(
                        mode = %ctx.mode,
                        fallback = %fallback,
                        error = %err,
                        "dispatch failed, falling back"
                    );
                    debug!(phase = %TurnPhase::Fallback, "turn phase");
                    self.dispatch(fallback, ctx).await
                }
                None => Err(err),
            },
        }
    }

    async fn dispatch(
        &self,
        mode: TurnMode,
        ctx: &TurnContext,
    ) -> Result<crate::stream::FragmentStream, TurnError> {
        strategy::dispatch(
            &self.model,
            &self.search,
            &self.extractor,
            mode,
            ctx,
            self.replay_delay,
        )
        .await
    }

    /// Settle a failed turn: the transcript gets a short fixed string,
    /// the raw error goes into the side-channel detail slot.
    fn apply_failure<P: SessionPersistence>(
        &self,
        store: &mut ChatSessionStore<P>,
        ctx: &TurnContext,
        err: TurnError,
    ) -> TurnOutcome {
        let user_message = strategy::failure_message(&err);
        warn!(error = %err, "turn failed");
        store.replace_trailing_assistant(ctx.session_id, user_message);

        let detail = match err {
            TurnError::Network {
                detail: Some(detail),
                ..
            } => detail,
            other => serde_json::Value::String(other.to_string()),
        };

        TurnOutcome::Failed(TurnFailure {
            user_message: user_message.to_string(),
            detail: Some(detail),
        })
    }
}
