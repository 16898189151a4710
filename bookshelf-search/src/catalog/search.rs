//! Core search orchestrator: query, filter, normalize, de-duplicate, rank.

use crate::catalog::dedup::deduplicate;
use crate::catalog::normalize::normalize_all;
use crate::catalog::ranking::rank;
use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::provider::CatalogProvider;
use crate::types::{SearchPage, SearchRequest, SearchType};

/// Build a provider request from user input.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidQuery`] if the query is blank.
pub fn build_request(
    query: &str,
    search_type: SearchType,
    config: &CatalogConfig,
) -> Result<SearchRequest, CatalogError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(CatalogError::InvalidQuery(
            "Please enter a search term".into(),
        ));
    }
    Ok(SearchRequest {
        query: query.to_owned(),
        search_type,
        limit: config.max_results,
    })
}

/// Run the initial search and return the ranked page.
///
/// # Pipeline
///
/// 1. Query the provider under a hard `config.search_timeout()` deadline
/// 2. Drop documents without a title, a key, or any of {author, ISBN, OCLC}
/// 3. Normalize survivors and flag those needing hydration
/// 4. De-duplicate by work key
/// 5. Rank by cover availability and truncate to `request.limit`
///
/// Nothing is retried here; hydration is left to the caller.
///
/// # Errors
///
/// [`CatalogError::Timeout`] when the deadline passes, otherwise whatever the
/// provider reported ([`CatalogError::Upstream`] or [`CatalogError::Network`]).
pub async fn orchestrate_search<P: CatalogProvider>(
    provider: &P,
    request: &SearchRequest,
    config: &CatalogConfig,
) -> Result<SearchPage, CatalogError> {
    let deadline = config.search_timeout();
    let raw = tokio::time::timeout(deadline, provider.search(request))
        .await
        .map_err(|_| {
            CatalogError::Timeout(format!("search exceeded {}s", deadline.as_secs()))
        })??;

    let raw_count = raw.docs.len();
    let records = deduplicate(normalize_all(raw.docs));
    let records = rank(records, request.limit);

    let pending = records.iter().filter(|r| r.needs_hydration).count();
    tracing::debug!(
        raw_count,
        kept = records.len(),
        pending,
        total_found = raw.num_found,
        "search results ranked"
    );

    Ok(SearchPage {
        records,
        total_found: raw.num_found,
        start: raw.start,
    })
}
