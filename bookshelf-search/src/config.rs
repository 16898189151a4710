//! Catalog configuration with sensible defaults.
//!
//! [`CatalogConfig`] controls endpoints, timeouts, result window, and the
//! hydration pool. The defaults target the public Open Library API.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CatalogError;

/// Configuration for catalog search and hydration.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides. Deserializes from a partial table; missing fields take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL of the catalog host (search, works and editions endpoints).
    pub base_url: String,
    /// Base URL of the cover image host.
    pub covers_base_url: String,
    /// Result window: the initial search never returns more than this.
    pub max_results: usize,
    /// Hard deadline for the initial search, in seconds.
    pub search_timeout_seconds: u64,
    /// Per-request timeout for hydration calls, in seconds.
    pub request_timeout_seconds: u64,
    /// Per-candidate timeout when verifying a cover image, in seconds.
    pub cover_timeout_seconds: u64,
    /// How many records are hydrated concurrently (chunk size).
    pub hydration_concurrency: usize,
    /// Pause between hydration chunks, in milliseconds.
    pub chunk_pause_ms: u64,
    /// How many editions are requested per work.
    pub editions_limit: usize,
    /// Maximum number of verified cover URLs kept in memory.
    pub cover_cache_capacity: usize,
    /// How long ranked search pages are cached, in seconds. 0 disables.
    pub cache_ttl_seconds: u64,
    /// Custom User-Agent string. Defaults to `bookshelf/<version>`.
    pub user_agent: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openlibrary.org".to_owned(),
            covers_base_url: "https://covers.openlibrary.org".to_owned(),
            max_results: 20,
            search_timeout_seconds: 10,
            request_timeout_seconds: 10,
            cover_timeout_seconds: 8,
            hydration_concurrency: 3,
            chunk_pause_ms: 100,
            editions_limit: 50,
            cover_cache_capacity: 500,
            cache_ttl_seconds: 600,
            user_agent: None,
        }
    }
}

impl CatalogConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - counts and timeouts must be greater than 0
    /// - both base URLs must parse as absolute http(s) URLs
    pub fn validate(&self) -> Result<(), CatalogError> {
        let positive = [
            ("max_results", self.max_results as u64),
            ("search_timeout_seconds", self.search_timeout_seconds),
            ("request_timeout_seconds", self.request_timeout_seconds),
            ("cover_timeout_seconds", self.cover_timeout_seconds),
            ("hydration_concurrency", self.hydration_concurrency as u64),
            ("editions_limit", self.editions_limit as u64),
            ("cover_cache_capacity", self.cover_cache_capacity as u64),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(CatalogError::Config(format!(
                    "{name} must be greater than 0"
                )));
            }
        }
        for (name, raw) in [
            ("base_url", &self.base_url),
            ("covers_base_url", &self.covers_base_url),
        ] {
            let parsed = url::Url::parse(raw)
                .map_err(|e| CatalogError::Config(format!("{name} is not a valid URL: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(CatalogError::Config(format!(
                    "{name} must use http or https"
                )));
            }
        }
        Ok(())
    }

    /// Deadline for the initial search.
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_seconds)
    }

    /// Deadline for a single cover verification attempt.
    pub fn cover_timeout(&self) -> Duration {
        Duration::from_secs(self.cover_timeout_seconds)
    }

    /// Pause inserted between hydration chunks.
    pub fn chunk_pause(&self) -> Duration {
        Duration::from_millis(self.chunk_pause_ms)
    }

    /// `base_url` without a trailing slash.
    pub(crate) fn catalog_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// `covers_base_url` without a trailing slash.
    pub(crate) fn covers_root(&self) -> &str {
        self.covers_base_url.trim_end_matches('/')
    }
}
