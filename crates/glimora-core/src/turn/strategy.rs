//! Mode strategies: one dispatch path per [`TurnMode`].
//!
//! Each strategy turns a `TurnContext` into a fragment stream. Dispatch
//! errors (search failure, extraction failure, missing credentials) are
//! returned eagerly so the controller can walk the fallback chain;
//! streaming errors surface as items inside the returned stream.

use std::time::Duration;

use futures_util::StreamExt;
use tracing::debug;

use glimora_types::error::TurnError;
use glimora_types::message::Message;
use glimora_types::search::SearchResponse;
use glimora_types::turn::TurnMode;

use crate::client::{ChatModelClient, SearchClient, TextExtractor};
use crate::stream::{decode_fragments, FragmentStream};
use crate::turn::context::TurnContext;

/// Replaces the trailing assistant message when a model or search step
/// fails without a fallback.
pub const MODEL_FAILURE_MESSAGE: &str = "Failed to get response from AI";

/// Replaces the trailing assistant message when extraction fails.
pub const EXTRACTION_FAILURE_MESSAGE: &str = "Failed to process file content";

/// Emitted when the search collaborator returns nothing usable.
pub const NO_RESULTS_MESSAGE: &str =
    "No direct answer or sources found, but here is what we found from the web.";

/// Maximum number of search results rendered into sources or prompts.
const MAX_SOURCES: usize = 3;

/// Dispatch one strategy and return its fragment stream.
pub(crate) async fn dispatch<M, S, X>(
    model: &M,
    search: &S,
    extractor: &X,
    mode: TurnMode,
    ctx: &TurnContext,
    replay_delay: Duration,
) -> Result<FragmentStream, TurnError>
where
    M: ChatModelClient,
    S: SearchClient,
    X: TextExtractor,
{
    match mode {
        TurnMode::Plain => Ok(model_stream(model, ctx.base_messages.clone())),
        TurnMode::FileAugmented => file_augmented(model, extractor, ctx).await,
        TurnMode::WebSearch => {
            let response = search.search(ctx.user_text()).await?;
            debug!(results = response.results.len(), "search results received");
            let content = format_search_content(&response);
            Ok(replay_stream(content, replay_delay))
        }
        TurnMode::WebSearchSummarize => {
            let response = search.search(ctx.user_text()).await?;
            debug!(results = response.results.len(), "search results received");
            let mut messages = ctx.base_messages.clone();
            messages.push(Message::system(summarize_prompt(&response)));
            Ok(model_stream(model, messages))
        }
    }
}

/// Stream a model completion and decode it into text fragments.
fn model_stream<M: ChatModelClient>(model: &M, messages: Vec<Message>) -> FragmentStream {
    let bytes = model
        .stream_chat(messages)
        .map(|item| item.map_err(TurnError::from));
    Box::pin(decode_fragments(bytes))
}

/// Extract the attached document, then stream a model completion with the
/// extracted text as an added system message.
///
/// Extraction failure short-circuits: no model request is made. The
/// extraction await itself is not cancellable; cancellation takes effect
/// at the controller's next checkpoint.
async fn file_augmented<M, X>(
    model: &M,
    extractor: &X,
    ctx: &TurnContext,
) -> Result<FragmentStream, TurnError>
where
    M: ChatModelClient,
    X: TextExtractor,
{
    let path = ctx
        .attachment
        .as_ref()
        .ok_or_else(|| TurnError::Extraction("no file attached".to_string()))?;

    let text = extractor.extract(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    debug!(file = %name, chars = text.len(), "document extracted");

    let mut messages = ctx.base_messages.clone();
    messages.push(Message::system(format!(
        "Processing PDF file: {name}\n\n{text}"
    )));
    Ok(model_stream(model, messages))
}

/// Render a search response into the displayed answer text.
///
/// The answer (if any) is followed by up to [`MAX_SOURCES`] result links
/// under a "**Sources:**" heading. A response with nothing usable yields
/// [`NO_RESULTS_MESSAGE`].
fn format_search_content(response: &SearchResponse) -> String {
    if response.is_empty() {
        return NO_RESULTS_MESSAGE.to_string();
    }

    let sources: Vec<String> = response
        .results
        .iter()
        .take(MAX_SOURCES)
        .map(|r| format!("- [{}]({})", r.title, r.url))
        .collect();

    let content = if sources.is_empty() {
        response.answer.clone()
    } else {
        format!("{}\n\n**Sources:**\n{}", response.answer, sources.join("\n"))
    };
    content.trim().to_string()
}

/// Build the synthetic system message that asks the model to summarize
/// search findings.
fn summarize_prompt(response: &SearchResponse) -> String {
    let mut prompt = String::from(
        "Summarize the following web search findings for the user in a \
         concise, conversational reply. Cite the sources by name where \
         relevant.\n",
    );
    if !response.answer.trim().is_empty() {
        prompt.push_str("\nAnswer: ");
        prompt.push_str(response.answer.trim());
        prompt.push('\n');
    }
    if !response.results.is_empty() {
        prompt.push_str("\nSources:\n");
        for result in response.results.iter().take(MAX_SOURCES) {
            prompt.push_str(&format!(
                "- {} ({}): {}\n",
                result.title, result.url, result.snippet
            ));
        }
    }
    prompt
}

/// Replay an already-complete document word-by-word at a fixed cadence.
///
/// Simulated streaming: the search collaborator returns a finished
/// answer, so fragments are produced by splitting on spaces (keeping the
/// separator, so concatenation is lossless) with a delay per fragment.
fn replay_stream(content: String, delay: Duration) -> FragmentStream {
    Box::pin(async_stream::try_stream! {
        for word in content.split_inclusive(' ') {
            tokio::time::sleep(delay).await;
            yield word.to_string();
        }
    })
}

/// The fixed transcript string for a failed turn.
pub(crate) fn failure_message(err: &TurnError) -> &'static str {
    match err {
        TurnError::Extraction(_) => EXTRACTION_FAILURE_MESSAGE,
        TurnError::Configuration(_) | TurnError::Network { .. } | TurnError::Decode(_) => {
            MODEL_FAILURE_MESSAGE
        }
    }
}
