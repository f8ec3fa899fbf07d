//! OpenRouter SSE stream to content-byte adapter.
//!
//! Sends the completion request and maps the SSE response into the raw
//! byte chunks [`ModelByteStream`] promises. UTF-8 reassembly is the
//! decoder's job downstream; this layer only strips the SSE envelope.
//!
//! Chunks without a text delta (role announcements, finish_reason-only
//! chunks, keep-alive comments) are skipped. The `[DONE]` sentinel ends
//! the stream.

use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use glimora_core::client::ModelByteStream;
use glimora_types::error::ModelError;

use super::types::{ChatCompletionRequest, CompletionChunk, DONE_SENTINEL};

/// POST the request and adapt the SSE response into content bytes.
pub(super) fn create_completion_stream(
    client: reqwest::Client,
    url: String,
    body: ChatCompletionRequest,
    api_key: SecretString,
    referer: String,
    title: &'static str,
) -> ModelByteStream {
    Box::pin(async_stream::try_stream! {
        let response = client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key.expose_secret()))
            .header("HTTP-Referer", &referer)
            .header("X-Title", title)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::Request(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            Err(ModelError::Http {
                status: status.as_u16(),
                body: error_body,
            })?;
        } else {
            let mut events = response.bytes_stream().eventsource();
            while let Some(event) = events.next().await {
                let event = event.map_err(|e| ModelError::Stream(e.to_string()))?;
                if event.data == DONE_SENTINEL {
                    debug!("completion stream finished");
                    break;
                }

                let chunk: CompletionChunk = serde_json::from_str(&event.data)
                    .map_err(|e| ModelError::Deserialization(format!("stream chunk: {e}")))?;

                if let Some(text) = chunk.content() {
                    if !text.is_empty() {
                        yield text.as_bytes().to_vec();
                    }
                }
            }
        }
    })
}
