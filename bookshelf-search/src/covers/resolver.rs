//! Sequential cover verification with memoization.
//!
//! Candidates are tried strictly one after another: a candidate is only
//! abandoned once its load failed, timed out, or produced a placeholder no
//! larger than 1x1. No candidate is retried within one resolution.

use std::sync::Arc;
use std::time::Duration;

use crate::config::CatalogConfig;
use crate::provider::CoverInspector;
use crate::types::CoverSize;

use super::cache::{cache_key, CoverCache, ResolvedCover};
use super::candidates::{candidates, CoverIdentifiers};

/// Outcome of resolving one book's cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverResolution {
    /// A candidate loaded with real dimensions.
    Found(ResolvedCover),
    /// No identifiers, or every candidate failed.
    NotAvailable,
}

impl CoverResolution {
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Found(cover) => Some(&cover.url),
            Self::NotAvailable => None,
        }
    }
}

/// Resolves cover URLs through a [`CoverInspector`], memoized in a shared
/// [`CoverCache`].
#[derive(Debug)]
pub struct CoverResolver<Pr> {
    inspector: Pr,
    cache: Arc<CoverCache>,
    covers_root: String,
    attempt_timeout: Duration,
}

impl<Pr: CoverInspector> CoverResolver<Pr> {
    /// Create a resolver using `config`'s cover host and per-attempt timeout.
    pub fn new(inspector: Pr, cache: Arc<CoverCache>, config: &CatalogConfig) -> Self {
        Self {
            inspector,
            cache,
            covers_root: config.covers_root().to_owned(),
            attempt_timeout: config.cover_timeout(),
        }
    }

    pub fn cache(&self) -> &Arc<CoverCache> {
        &self.cache
    }

    /// Resolve a cover, answering from the cache when possible and storing
    /// newly verified covers. Failures are never cached.
    pub async fn resolve(&self, ids: &CoverIdentifiers<'_>, size: CoverSize) -> CoverResolution {
        let key = cache_key(ids).map(|k| format!("{k}#{size}"));
        if let Some(hit) = key.as_deref().and_then(|k| self.cache.get(k)) {
            tracing::trace!(url = %hit.url, "cover cache hit");
            return CoverResolution::Found(hit);
        }

        let resolution = self.resolve_uncached(ids, size).await;
        if let (Some(key), CoverResolution::Found(cover)) = (key, &resolution) {
            self.cache.insert(key, cover.clone());
        }
        resolution
    }

    /// Run the fallback chain without touching the cache.
    pub async fn resolve_uncached(
        &self,
        ids: &CoverIdentifiers<'_>,
        size: CoverSize,
    ) -> CoverResolution {
        for candidate in candidates(ids, &self.covers_root, size) {
            let attempt = self.inspector.fetch_dimensions(&candidate.url);
            match tokio::time::timeout(self.attempt_timeout, attempt).await {
                Ok(Ok(dims)) if dims.is_usable() => {
                    tracing::debug!(source = %candidate.source, url = %candidate.url, "cover verified");
                    return CoverResolution::Found(ResolvedCover {
                        url: candidate.url,
                        source: candidate.source,
                    });
                }
                Ok(Ok(dims)) => {
                    tracing::trace!(url = %candidate.url, width = dims.width, height = dims.height, "placeholder cover rejected");
                }
                Ok(Err(err)) => {
                    tracing::trace!(url = %candidate.url, error = %err, "cover candidate failed");
                }
                Err(_) => {
                    tracing::trace!(url = %candidate.url, "cover candidate timed out");
                }
            }
        }
        CoverResolution::NotAvailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::covers::CoverSource;
    use crate::error::CatalogError;
    use crate::provider::ImageDimensions;
    use crate::types::BookRecord;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Clone, Copy)]
    enum Reply {
        Image(u32, u32),
        Missing,
        Hang,
    }

    #[derive(Default)]
    struct ScriptedInspector {
        replies: HashMap<String, Reply>,
        attempts: Mutex<Vec<String>>,
    }

    impl ScriptedInspector {
        fn with(replies: &[(&str, Reply)]) -> Self {
            Self {
                replies: replies.iter().map(|(u, r)| (u.to_string(), *r)).collect(),
                attempts: Mutex::new(Vec::new()),
            }
        }

        fn attempts(&self) -> Vec<String> {
            self.attempts.lock().expect("lock").clone()
        }
    }

    impl CoverInspector for ScriptedInspector {
        async fn fetch_dimensions(&self, url: &str) -> Result<ImageDimensions, CatalogError> {
            self.attempts.lock().expect("lock").push(url.to_owned());
            match self.replies.get(url).copied().unwrap_or(Reply::Missing) {
                Reply::Image(width, height) => Ok(ImageDimensions { width, height }),
                Reply::Missing => Err(CatalogError::Upstream {
                    status: 404,
                    context: "cover".into(),
                }),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(CatalogError::Timeout("unreachable".into()))
                }
            }
        }
    }

    const ROOT: &str = "http://covers.test";

    fn config() -> CatalogConfig {
        CatalogConfig {
            covers_base_url: ROOT.into(),
            ..Default::default()
        }
    }

    fn resolver(inspector: ScriptedInspector) -> CoverResolver<ScriptedInspector> {
        CoverResolver::new(inspector, Arc::new(CoverCache::new(500)), &config())
    }

    fn isbn_record(isbns: &[&str]) -> BookRecord {
        let mut record = BookRecord::new("OL1W", "Dune");
        record.isbn = isbns.iter().map(|s| s.to_string()).collect();
        record
    }

    #[tokio::test]
    async fn isbn_pair_tried_a_then_b_then_gives_up() {
        let resolver = resolver(ScriptedInspector::default());
        let record = isbn_record(&["A", "B"]);

        let resolution = resolver.resolve(&(&record).into(), CoverSize::M).await;

        assert_eq!(resolution, CoverResolution::NotAvailable);
        assert_eq!(
            resolver.inspector.attempts(),
            [format!("{ROOT}/b/isbn/A-M.jpg"), format!("{ROOT}/b/isbn/B-M.jpg")]
        );
    }

    #[tokio::test]
    async fn stops_at_first_real_image() {
        let url_b = format!("{ROOT}/b/isbn/B-M.jpg");
        let inspector = ScriptedInspector::with(&[(url_b.as_str(), Reply::Image(180, 270))]);
        let mut record = isbn_record(&["A", "B"]);
        record.lccn = vec!["L".into()];
        let resolver = resolver(inspector);

        let resolution = resolver.resolve(&(&record).into(), CoverSize::M).await;

        assert_eq!(resolution.url(), Some(url_b.as_str()));
        assert_eq!(resolver.inspector.attempts().len(), 2, "LCCN never tried");
    }

    #[tokio::test]
    async fn one_pixel_placeholder_advances_to_next_candidate() {
        let url_a = format!("{ROOT}/b/isbn/A-M.jpg");
        let url_b = format!("{ROOT}/b/isbn/B-M.jpg");
        let inspector = ScriptedInspector::with(&[
            (url_a.as_str(), Reply::Image(1, 1)),
            (url_b.as_str(), Reply::Image(100, 150)),
        ]);
        let resolver = resolver(inspector);
        let record = isbn_record(&["A", "B"]);

        match resolver.resolve(&(&record).into(), CoverSize::M).await {
            CoverResolution::Found(cover) => {
                assert_eq!(cover.url, url_b);
                assert_eq!(cover.source, CoverSource::SecondaryIsbn);
            }
            other => panic!("expected a cover, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_candidate_times_out_and_falls_through() {
        let url_a = format!("{ROOT}/b/isbn/A-M.jpg");
        let url_b = format!("{ROOT}/b/isbn/B-M.jpg");
        let inspector = ScriptedInspector::with(&[
            (url_a.as_str(), Reply::Hang),
            (url_b.as_str(), Reply::Image(100, 150)),
        ]);
        let resolver = resolver(inspector);
        let record = isbn_record(&["A", "B"]);

        let resolution = resolver.resolve(&(&record).into(), CoverSize::M).await;
        assert_eq!(resolution.url(), Some(url_b.as_str()));
    }

    #[tokio::test]
    async fn no_identifiers_resolve_to_not_available_without_probing() {
        let resolver = resolver(ScriptedInspector::default());
        let record = BookRecord::new("OL1W", "Dune");
        let resolution = resolver.resolve(&(&record).into(), CoverSize::M).await;
        assert_eq!(resolution, CoverResolution::NotAvailable);
        assert!(resolver.inspector.attempts().is_empty());
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let url = format!("{ROOT}/b/id/42-M.jpg");
        let inspector = ScriptedInspector::with(&[(url.as_str(), Reply::Image(200, 300))]);
        let resolver = resolver(inspector);
        let mut record = BookRecord::new("OL1W", "Dune");
        record.cover_id = Some(42);

        let first = resolver.resolve(&(&record).into(), CoverSize::M).await;
        let second = resolver.resolve(&(&record).into(), CoverSize::M).await;

        assert_eq!(first, second);
        assert_eq!(resolver.inspector.attempts().len(), 1);
        assert_eq!(resolver.cache().len(), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let resolver = resolver(ScriptedInspector::default());
        let record = isbn_record(&["A"]);
        resolver.resolve(&(&record).into(), CoverSize::M).await;
        resolver.resolve(&(&record).into(), CoverSize::M).await;
        assert_eq!(resolver.inspector.attempts().len(), 2);
        assert!(resolver.cache().is_empty());
    }

    #[tokio::test]
    async fn sizes_are_cached_separately() {
        let medium_url = format!("{ROOT}/b/id/42-M.jpg");
        let large_url = format!("{ROOT}/b/id/42-L.jpg");
        let inspector = ScriptedInspector::with(&[
            (medium_url.as_str(), Reply::Image(200, 300)),
            (large_url.as_str(), Reply::Image(400, 600)),
        ]);
        let resolver = resolver(inspector);
        let mut record = BookRecord::new("OL1W", "Dune");
        record.cover_id = Some(42);

        let medium = resolver.resolve(&(&record).into(), CoverSize::M).await;
        let large = resolver.resolve(&(&record).into(), CoverSize::L).await;
        assert_ne!(medium.url(), large.url());
        assert_eq!(resolver.cache().len(), 2);
    }
}
