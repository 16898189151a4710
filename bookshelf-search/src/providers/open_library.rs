//! Open Library backend: search, works, editions and cover endpoints.
//!
//! Talks to the public JSON API at `https://openlibrary.org` and the cover
//! host at `https://covers.openlibrary.org`. Both roots come from
//! [`CatalogConfig`] so tests can point them at a mock server.

use std::io::Cursor;

use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;

use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::http;
use crate::provider::{CatalogProvider, CoverInspector, ImageDimensions};
use crate::types::SearchRequest;
use crate::wire::{EditionsResponse, RawEdition, RawSearchResponse, WorkDetail};

/// Attribute projection requested from the search endpoint.
pub const SEARCH_FIELDS: &str = "key,title,author_name,cover_i,cover_edition_key,edition_count,\
first_publish_year,isbn,lccn,oclc,publisher,subject,language,number_of_pages_median";

/// Open Library API client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct OpenLibraryClient {
    client: reqwest::Client,
    catalog_root: String,
}

impl OpenLibraryClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Config`] if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        Ok(Self {
            client: http::build_client(config)?,
            catalog_root: config.catalog_root().to_owned(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        context: &str,
    ) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| CatalogError::from_reqwest(context, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Upstream {
                status: status.as_u16(),
                context: context.to_owned(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Network(format!("{context}: unreadable response body: {e}")))
    }
}

impl CatalogProvider for OpenLibraryClient {
    async fn search(&self, request: &SearchRequest) -> Result<RawSearchResponse, CatalogError> {
        tracing::trace!(query = %request.query, search_type = %request.search_type, "Open Library search");

        let url = format!("{}/search.json", self.catalog_root);
        let params = [
            ("limit", request.limit.to_string()),
            ("fields", SEARCH_FIELDS.to_owned()),
            (request.search_type.param_key(), request.query.clone()),
        ];
        let body: RawSearchResponse = self.get_json(&url, &params, "search").await?;

        tracing::trace!(docs = body.docs.len(), num_found = body.num_found, "Open Library search response");
        Ok(body)
    }

    async fn fetch_work(&self, work_key: &str) -> Result<WorkDetail, CatalogError> {
        let url = format!("{}/works/{work_key}.json", self.catalog_root);
        self.get_json(&url, &[], "work detail").await
    }

    async fn fetch_editions(
        &self,
        work_key: &str,
        limit: usize,
    ) -> Result<Vec<RawEdition>, CatalogError> {
        let url = format!("{}/works/{work_key}/editions.json", self.catalog_root);
        let body: EditionsResponse = self
            .get_json(&url, &[("limit", limit.to_string())], "editions")
            .await?;
        Ok(body.entries)
    }
}

impl CoverInspector for OpenLibraryClient {
    async fn fetch_dimensions(&self, url: &str) -> Result<ImageDimensions, CatalogError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "image/*")
            .send()
            .await
            .map_err(|e| CatalogError::from_reqwest("cover", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Upstream {
                status: status.as_u16(),
                context: "cover".to_owned(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CatalogError::from_reqwest("cover", e))?;
        image_dimensions(&bytes)
    }
}

/// Read width and height from an encoded image without decoding pixels.
pub(crate) fn image_dimensions(bytes: &[u8]) -> Result<ImageDimensions, CatalogError> {
    let (width, height) = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CatalogError::Network(format!("cover: unreadable image: {e}")))?
        .into_dimensions()
        .map_err(|e| CatalogError::Network(format!("cover: unreadable image: {e}")))?;
    Ok(ImageDimensions { width, height })
}
