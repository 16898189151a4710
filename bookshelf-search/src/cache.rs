//! In-memory TTL cache for ranked search pages.
//!
//! Keyed by the (lowercased query, search type, limit) triple. Uses
//! [`moka`] for async-friendly caching with TTL and size-bounded eviction.
//! Each [`SearchCache`] is an independent instance owned by its session.

use std::time::Duration;

use moka::future::Cache;

use crate::types::{SearchPage, SearchRequest, SearchType};

/// Maximum number of cached search pages.
const MAX_CACHE_ENTRIES: u64 = 100;

/// Composite cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Lowercased, trimmed query string.
    query: String,
    search_type: SearchType,
    limit: usize,
}

impl CacheKey {
    /// Build a key from a request. The query is lowercased and trimmed so
    /// `"Dune "` and `"dune"` share an entry.
    pub fn new(request: &SearchRequest) -> Self {
        Self {
            query: request.query.trim().to_lowercase(),
            search_type: request.search_type,
            limit: request.limit,
        }
    }
}

/// Process-local cache of ranked search pages.
#[derive(Clone)]
pub struct SearchCache {
    inner: Cache<CacheKey, SearchPage>,
}

impl SearchCache {
    /// Create a cache whose entries expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(MAX_CACHE_ENTRIES)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Create a cache from a TTL in seconds; `0` disables caching.
    pub fn from_ttl_seconds(ttl_seconds: u64) -> Option<Self> {
        (ttl_seconds > 0).then(|| Self::new(Duration::from_secs(ttl_seconds)))
    }

    /// Look up a cached page.
    pub async fn get(&self, request: &SearchRequest) -> Option<SearchPage> {
        self.inner.get(&CacheKey::new(request)).await
    }

    /// Store a freshly ranked page.
    pub async fn insert(&self, request: &SearchRequest, page: SearchPage) {
        self.inner.insert(CacheKey::new(request), page).await;
    }
}

impl std::fmt::Debug for SearchCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchCache")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BookRecord;

    fn request(query: &str, search_type: SearchType, limit: usize) -> SearchRequest {
        SearchRequest {
            query: query.into(),
            search_type,
            limit,
        }
    }

    fn page(title: &str) -> SearchPage {
        SearchPage {
            records: vec![BookRecord::new("OL1W", title)],
            total_found: 1,
            start: 0,
        }
    }

    #[test]
    fn cache_key_normalises_case_and_whitespace() {
        let a = CacheKey::new(&request("  Dune ", SearchType::Title, 20));
        let b = CacheKey::new(&request("dune", SearchType::Title, 20));
        assert_eq!(a, b);
    }

    #[test]
    fn cache_key_differs_by_search_type_and_limit() {
        let base = CacheKey::new(&request("dune", SearchType::Title, 20));
        assert_ne!(base, CacheKey::new(&request("dune", SearchType::Author, 20)));
        assert_ne!(base, CacheKey::new(&request("dune", SearchType::Title, 10)));
    }

    #[test]
    fn zero_ttl_disables_cache() {
        assert!(SearchCache::from_ttl_seconds(0).is_none());
        assert!(SearchCache::from_ttl_seconds(600).is_some());
    }

    #[tokio::test]
    async fn miss_returns_none() {
        let cache = SearchCache::new(Duration::from_secs(600));
        assert!(cache.get(&request("nothing", SearchType::Any, 20)).await.is_none());
    }

    #[tokio::test]
    async fn insert_and_retrieve() {
        let cache = SearchCache::new(Duration::from_secs(600));
        cache.insert(&request("Dune", SearchType::Title, 20), page("Dune")).await;

        let cached = cache
            .get(&request("dune", SearchType::Title, 20))
            .await
            .expect("should be cached");
        assert_eq!(cached.records[0].title, "Dune");
    }

    #[tokio::test]
    async fn overwrite_same_key_updates_value() {
        let cache = SearchCache::new(Duration::from_secs(600));
        let key = request("dune", SearchType::Title, 20);
        cache.insert(&key, page("Old")).await;
        cache.insert(&key, page("New")).await;
        let cached = cache.get(&key).await.expect("should be cached");
        assert_eq!(cached.records[0].title, "New");
    }

    #[tokio::test]
    async fn instances_do_not_share_entries() {
        let first = SearchCache::new(Duration::from_secs(600));
        let second = SearchCache::new(Duration::from_secs(600));
        let key = request("dune", SearchType::Title, 20);
        first.insert(&key, page("Dune")).await;
        assert!(second.get(&key).await.is_none());
    }
}
