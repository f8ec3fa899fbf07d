//! OpenRouterClient -- concrete [`ChatModelClient`] implementation.
//!
//! Sends requests to the OpenRouter chat-completions API
//! (`/chat/completions`) with bearer authentication plus the attribution
//! headers OpenRouter expects (`HTTP-Referer`, `X-Title`).
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output. A client built without a key still
//! satisfies the trait: its stream yields
//! [`ModelError::MissingCredentials`] as the first item, which the turn
//! controller turns into the fixed failure transcript.

use std::time::Duration;

use futures_util::stream;
use secrecy::SecretString;

use glimora_core::client::{ChatModelClient, ModelByteStream};
use glimora_types::error::ModelError;
use glimora_types::message::Message;

use super::streaming::create_completion_stream;
use super::types::{ChatCompletionRequest, WireMessage};

/// OpenRouter chat-completions client.
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
    model: String,
    referer: String,
}

impl OpenRouterClient {
    /// Identifies the app to OpenRouter's ranking dashboard.
    const APP_TITLE: &'static str = "Glimora";

    /// Create a new OpenRouter client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenRouter API key, if one is configured
    /// * `model` - Model identifier (e.g., "deepseek/deepseek-chat-v3-0324:free")
    /// * `referer` - Value for the `HTTP-Referer` attribution header
    pub fn new(api_key: Option<SecretString>, model: String, referer: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300)) // 5 min timeout for long generations
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model,
            referer,
        }
    }

    /// The model this client requests completions from.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Override the base URL (useful for testing or proxies).
    #[allow(dead_code)]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Convert the session's message log into the wire request body.
    fn to_request(&self, messages: Vec<Message>) -> ChatCompletionRequest {
        let messages = messages
            .into_iter()
            .map(|m| WireMessage {
                role: m.role.to_string(),
                content: m.content,
            })
            .collect();

        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            stream: true,
        }
    }
}

// OpenRouterClient intentionally does NOT derive Debug so the key can
// never ride along in formatted internal state.

impl ChatModelClient for OpenRouterClient {
    fn stream_chat(&self, messages: Vec<Message>) -> ModelByteStream {
        let Some(api_key) = self.api_key.clone() else {
            return Box::pin(stream::once(async { Err(ModelError::MissingCredentials) }));
        };

        let body = self.to_request(messages);
        create_completion_stream(
            self.client.clone(),
            self.url("/chat/completions"),
            body,
            api_key,
            self.referer.clone(),
            Self::APP_TITLE,
        )
    }
}
