//! Web-search collaborator implementations.

mod tavily;

pub use tavily::TavilySearchClient;
