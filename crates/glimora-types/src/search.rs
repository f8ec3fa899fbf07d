//! Web search result types for Glimora.
//!
//! These model the search collaborator's response as seen by the core:
//! an optional direct answer plus an ordered list of results.

use serde::{Deserialize, Serialize};

/// A single web search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Response from the search collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Direct answer text, possibly empty.
    #[serde(default)]
    pub answer: String,
    /// Results ordered by relevance.
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

impl SearchResponse {
    /// Whether the response contains nothing usable (no answer text and
    /// no results).
    pub fn is_empty(&self) -> bool {
        self.answer.trim().is_empty() && self.results.is_empty()
    }
}
