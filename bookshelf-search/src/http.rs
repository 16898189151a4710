//! Shared HTTP client for catalog and cover requests.
//!
//! Provides a configured [`reqwest::Client`] with a stable User-Agent,
//! JSON accept header, and the configured per-request timeout.

use crate::config::CatalogConfig;
use crate::error::CatalogError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use std::time::Duration;

/// Build a [`reqwest::Client`] for the catalog endpoints.
///
/// The client has:
/// - Request timeout from `config.request_timeout_seconds`
/// - `bookshelf/<version>` User-Agent (or the configured override)
/// - `Accept: application/json` by default
///
/// # Errors
///
/// Returns [`CatalogError::Config`] if the client cannot be constructed.
pub fn build_client(config: &CatalogConfig) -> Result<reqwest::Client, CatalogError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_seconds))
        .user_agent(user_agent(config))
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| CatalogError::Config(format!("failed to build HTTP client: {e}")))
}

/// The User-Agent sent with every request.
pub fn user_agent(config: &CatalogConfig) -> String {
    match config.user_agent {
        Some(ref custom) => custom.clone(),
        None => format!("bookshelf/{}", env!("CARGO_PKG_VERSION")),
    }
}
