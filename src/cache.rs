use moka::future::Cache;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::CacheConfig;
use crate::fetch::SearchResult;

/// TTL cache for search results, keyed by query string.
///
/// An explicit instance injected into the engine; there is no process-wide
/// shared cache. Entries expire after the configured TTL and the cache is
/// bounded, so a long-running session cannot grow without limit.
pub struct SearchCache {
    inner: Cache<String, Arc<Vec<SearchResult>>>,
    enabled: bool,
}

impl SearchCache {
    pub fn new(config: &CacheConfig) -> Self {
        let inner = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(Duration::from_secs(config.ttl_seconds))
            .build();

        Self { inner, enabled: config.enabled }
    }

    pub async fn get(&self, query: &str) -> Option<Arc<Vec<SearchResult>>> {
        if !self.enabled {
            return None;
        }

        let hit = self.inner.get(&Self::cache_key(query)).await;
        if hit.is_some() {
            debug!(query, "search cache hit");
        }
        hit
    }

    pub async fn insert(&self, query: &str, results: Vec<SearchResult>) {
        if !self.enabled {
            return;
        }
        self.inner.insert(Self::cache_key(query), Arc::new(results)).await;
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Normalized digest key so trivial casing/spacing variants share an
    /// entry.
    fn cache_key(query: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(query.trim().to_lowercase().as_bytes());
        format!("search:{:x}", hasher.finalize())
    }
}
