use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ResearchResult;

pub mod http_client;
pub mod rate_limiter;
pub mod retry;

pub use http_client::HttpFetcher;

/// A single search hit. Immutable, held only for one extraction pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub content: Option<String>,
}

impl SearchResult {
    /// Text the extractor sees for this hit.
    pub fn combined_text(&self) -> String {
        let mut text = format!("{} {}", self.title, self.snippet);
        if let Some(content) = &self.content {
            text.push(' ');
            text.push_str(content);
        }
        text
    }
}

/// Abstract source-fetching capability. The extraction and scoring core
/// never depends on which backend implements it; AI-generated narrative,
/// a search-engine page or a test double are all treated the same.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Run one search query and return its hits.
    async fn search(&self, query: &str) -> ResearchResult<Vec<SearchResult>>;

    /// Fetch a page body as plain text.
    async fn fetch_page(&self, url: &str) -> ResearchResult<String>;
}

/// In-memory test double for the fetcher boundary. Queries answer from a
/// canned table; unknown queries return no hits, and queries registered as
/// failing return the configured error.
pub struct StubFetcher {
    canned: std::collections::HashMap<String, Vec<SearchResult>>,
    failing: std::collections::HashMap<String, crate::error::ResearchError>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self {
            canned: std::collections::HashMap::new(),
            failing: std::collections::HashMap::new(),
        }
    }

    pub fn with_results(mut self, query: impl Into<String>, results: Vec<SearchResult>) -> Self {
        self.canned.insert(query.into(), results);
        self
    }

    pub fn with_failure(
        mut self,
        query: impl Into<String>,
        error: crate::error::ResearchError,
    ) -> Self {
        self.failing.insert(query.into(), error);
        self
    }

    /// Shorthand for a single text-only hit.
    pub fn hit(url: &str, text: &str) -> SearchResult {
        SearchResult {
            title: String::new(),
            url: url.to_string(),
            snippet: text.to_string(),
            content: None,
        }
    }
}

impl Default for StubFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceFetcher for StubFetcher {
    async fn search(&self, query: &str) -> ResearchResult<Vec<SearchResult>> {
        if let Some(error) = self.failing.get(query) {
            return Err(clone_error(error));
        }
        Ok(self.canned.get(query).cloned().unwrap_or_default())
    }

    async fn fetch_page(&self, _url: &str) -> ResearchResult<String> {
        Ok(String::new())
    }
}

// ResearchError is not Clone (reqwest sources aren't), so the stub rebuilds
// the variants it supports returning.
fn clone_error(error: &crate::error::ResearchError) -> crate::error::ResearchError {
    use crate::error::ResearchError;
    match error {
        ResearchError::Network { message } => ResearchError::Network { message: message.clone() },
        ResearchError::MissingCredentials { backend } => {
            ResearchError::MissingCredentials { backend: backend.clone() }
        }
        ResearchError::Search { query, message } => {
            ResearchError::Search { query: query.clone(), message: message.clone() }
        }
        other => ResearchError::internal(other.to_string()),
    }
}
