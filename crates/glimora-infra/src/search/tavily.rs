//! TavilySearchClient -- concrete [`SearchClient`] implementation.
//!
//! POSTs to the Tavily search API with the user's query wrapped in a
//! domain prompt so results stay on movies and dramas. Tavily returns an
//! optional synthesized answer plus ranked results; both are mapped into
//! the provider-agnostic [`SearchResponse`].
//!
//! Tavily authenticates via a key field in the request body rather than
//! a header, so the key is exposed exactly once per request.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use glimora_core::client::SearchClient;
use glimora_types::error::SearchError;
use glimora_types::search::{SearchResponse, SearchResult};

/// Fixed wrapper that steers Tavily toward the app's domain.
const QUERY_PREFIX: &str =
    "Find the latest movie or drama information, reviews, and news about: ";

/// Tavily web search client.
pub struct TavilySearchClient {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
}

impl TavilySearchClient {
    /// Create a new Tavily client.
    pub fn new(api_key: Option<SecretString>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://api.tavily.com".to_string(),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    #[allow(dead_code)]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: String,
    search_depth: &'static str,
    include_answer: bool,
    include_raw_content: bool,
    max_results: u32,
    time_range: &'static str,
    topic: &'static str,
}

impl<'a> TavilyRequest<'a> {
    fn new(api_key: &'a str, user_query: &str) -> Self {
        Self {
            api_key,
            query: format!("{QUERY_PREFIX}{user_query}"),
            search_depth: "basic",
            include_answer: true,
            include_raw_content: false,
            max_results: 5,
            time_range: "week",
            topic: "general",
        }
    }
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    /// Tavily calls the snippet "content".
    #[serde(default)]
    content: String,
}

impl From<TavilyResponse> for SearchResponse {
    fn from(response: TavilyResponse) -> Self {
        SearchResponse {
            answer: response.answer.unwrap_or_default(),
            results: response
                .results
                .into_iter()
                .map(|r| SearchResult {
                    title: r.title,
                    url: r.url,
                    snippet: r.content,
                })
                .collect(),
        }
    }
}

impl SearchClient for TavilySearchClient {
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        let Some(api_key) = self.api_key.as_ref() else {
            return Err(SearchError::MissingCredentials);
        };

        debug!(query = %query, "dispatching web search");
        let body = TavilyRequest::new(api_key.expose_secret(), query);

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchError::Request(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SearchError::Http {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let parsed: TavilyResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Deserialization(format!("failed to parse response: {e}")))?;

        Ok(parsed.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wraps_query_with_domain_prompt() {
        let request = TavilyRequest::new("key", "best thriller 2024");
        assert_eq!(
            request.query,
            "Find the latest movie or drama information, reviews, and news about: best thriller 2024"
        );
        assert_eq!(request.search_depth, "basic");
        assert!(request.include_answer);
        assert!(!request.include_raw_content);
        assert_eq!(request.max_results, 5);
        assert_eq!(request.time_range, "week");
        assert_eq!(request.topic, "general");
    }

    #[test]
    fn test_response_maps_to_search_response() {
        let json = r#"{
            "answer": "Dune won best picture.",
            "results": [
                {"title": "Oscars 2024", "url": "https://example.com/oscars", "content": "Full winner list", "score": 0.9}
            ]
        }"#;
        let parsed: TavilyResponse = serde_json::from_str(json).unwrap();
        let response: SearchResponse = parsed.into();

        assert_eq!(response.answer, "Dune won best picture.");
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].title, "Oscars 2024");
        assert_eq!(response.results[0].snippet, "Full winner list");
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let parsed: TavilyResponse = serde_json::from_str("{}").unwrap();
        let response: SearchResponse = parsed.into();
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_fails_eagerly() {
        let client = TavilySearchClient::new(None);
        let result = client.search("anything").await;
        assert!(matches!(result, Err(SearchError::MissingCredentials)));
    }
}
