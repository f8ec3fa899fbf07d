//! OpenRouter chat-completions client.

mod client;
mod streaming;
mod types;

pub use client::OpenRouterClient;
