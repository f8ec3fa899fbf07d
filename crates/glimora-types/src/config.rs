//! Global configuration types for Glimora.
//!
//! `GlimoraConfig` represents the top-level `config.toml` in the data
//! directory. All fields have sensible defaults so a missing or partial
//! file still yields a working configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Glimora chat client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlimoraConfig {
    /// Model identifier sent to the chat completion endpoint.
    #[serde(default = "default_model")]
    pub model: String,

    /// Delay between replayed fragments in web-search mode, in
    /// milliseconds.
    #[serde(default = "default_replay_delay_ms")]
    pub replay_delay_ms: u64,

    /// Value of the HTTP-Referer header sent to the model provider.
    #[serde(default = "default_referer")]
    pub referer: String,
}

fn default_model() -> String {
    "deepseek/deepseek-chat-v3-0324:free".to_string()
}

fn default_replay_delay_ms() -> u64 {
    30
}

fn default_referer() -> String {
    "http://localhost:3000".to_string()
}

impl Default for GlimoraConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            replay_delay_ms: default_replay_delay_ms(),
            referer: default_referer(),
        }
    }
}
