//! Wire types for the OpenRouter chat-completions API.
//!
//! Only the fields Glimora reads are modelled; everything else in a
//! streaming chunk is ignored by serde.

use serde::{Deserialize, Serialize};

/// SSE data payload that terminates the completion stream.
pub(super) const DONE_SENTINEL: &str = "[DONE]";

/// Request body for `POST /chat/completions`.
#[derive(Debug, Serialize)]
pub(super) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub stream: bool,
}

/// One message as OpenRouter expects it.
#[derive(Debug, Serialize)]
pub(super) struct WireMessage {
    pub role: String,
    pub content: String,
}

/// One SSE chunk of a streamed completion.
#[derive(Debug, Deserialize)]
pub(super) struct CompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionChunk {
    /// The text delta of the first choice, if any.
    pub fn content(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.delta.content.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_expected_shape() {
        let request = ChatCompletionRequest {
            model: "deepseek/deepseek-chat-v3-0324:free".to_string(),
            messages: vec![WireMessage {
                role: "user".to_string(),
                content: "Hello".to_string(),
            }],
            stream: true,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "deepseek/deepseek-chat-v3-0324:free");
        assert_eq!(json["stream"], true);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Hello");
    }

    #[test]
    fn test_chunk_parses_delta_content() {
        let data = r#"{"id":"gen-1","choices":[{"index":0,"delta":{"content":"Hel"},"finish_reason":null}]}"#;
        let chunk: CompletionChunk = serde_json::from_str(data).unwrap();
        assert_eq!(chunk.content(), Some("Hel"));
    }

    #[test]
    fn test_chunk_without_content_yields_none() {
        // The final chunk before [DONE] often carries only a finish_reason.
        let data = r#"{"id":"gen-1","choices":[{"index":0,"delta":{},"finish_reason":"stop"}]}"#;
        let chunk: CompletionChunk = serde_json::from_str(data).unwrap();
        assert_eq!(chunk.content(), None);
    }

    #[test]
    fn test_chunk_with_empty_choices() {
        let chunk: CompletionChunk = serde_json::from_str(r#"{"id":"gen-1"}"#).unwrap();
        assert_eq!(chunk.content(), None);
    }
}
