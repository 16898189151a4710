//! Trait definitions for pluggable catalog backends.
//!
//! The pipeline never talks HTTP directly: the initial search and the
//! hydration pass go through [`CatalogProvider`], cover verification goes
//! through [`CoverInspector`]. [`OpenLibraryClient`](crate::providers::OpenLibraryClient)
//! implements both against the public API; tests plug in in-memory fakes.

use crate::error::CatalogError;
use crate::types::SearchRequest;
use crate::wire::{RawEdition, RawSearchResponse, WorkDetail};

/// A catalog backend serving searches, work details and edition listings.
///
/// All implementations must be `Send + Sync`; hydration workers share one
/// provider across concurrent calls.
pub trait CatalogProvider: Send + Sync {
    /// Run a field-restricted search.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Upstream`] on a non-2xx answer, [`CatalogError::Timeout`]
    /// or [`CatalogError::Network`] on transport failure.
    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl std::future::Future<Output = Result<RawSearchResponse, CatalogError>> + Send;

    /// Fetch the detail document of one work, by bare work key (`OL123W`).
    fn fetch_work(
        &self,
        work_key: &str,
    ) -> impl std::future::Future<Output = Result<WorkDetail, CatalogError>> + Send;

    /// Fetch up to `limit` editions of one work.
    fn fetch_editions(
        &self,
        work_key: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<RawEdition>, CatalogError>> + Send;
}

/// Pixel dimensions reported by a successful image load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    /// The image host answers unknown covers with a 1x1 placeholder;
    /// anything not larger than that in both directions is rejected.
    pub fn is_usable(&self) -> bool {
        self.width > 1 && self.height > 1
    }
}

/// Loads an image far enough to learn its dimensions.
pub trait CoverInspector: Send + Sync {
    /// Load the image at `url`.
    ///
    /// # Errors
    ///
    /// Any failure to fetch or decode the image.
    fn fetch_dimensions(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<ImageDimensions, CatalogError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SearchType;
    use crate::wire::RawDoc;

    struct FixedCatalog {
        docs: Vec<RawDoc>,
    }

    impl CatalogProvider for FixedCatalog {
        async fn search(&self, request: &SearchRequest) -> Result<RawSearchResponse, CatalogError> {
            if request.query == "boom" {
                return Err(CatalogError::Upstream {
                    status: 500,
                    context: "search".into(),
                });
            }
            Ok(RawSearchResponse {
                docs: self.docs.clone(),
                num_found: self.docs.len() as u64,
                start: 0,
            })
        }

        async fn fetch_work(&self, _work_key: &str) -> Result<WorkDetail, CatalogError> {
            Ok(WorkDetail::default())
        }

        async fn fetch_editions(
            &self,
            _work_key: &str,
            limit: usize,
        ) -> Result<Vec<RawEdition>, CatalogError> {
            Ok(vec![RawEdition::default(); limit.min(2)])
        }
    }

    fn request(query: &str) -> SearchRequest {
        SearchRequest {
            query: query.into(),
            search_type: SearchType::Title,
            limit: 20,
        }
    }

    #[test]
    fn fake_catalog_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FixedCatalog>();
    }

    #[tokio::test]
    async fn fake_catalog_returns_docs() {
        let catalog = FixedCatalog {
            docs: vec![RawDoc {
                key: Some("/works/OL1W".into()),
                ..Default::default()
            }],
        };
        let response = catalog.search(&request("dune")).await.expect("search");
        assert_eq!(response.num_found, 1);
        assert_eq!(catalog.fetch_editions("OL1W", 50).await.expect("editions").len(), 2);
    }

    #[tokio::test]
    async fn fake_catalog_propagates_errors() {
        let catalog = FixedCatalog { docs: vec![] };
        let err = catalog.search(&request("boom")).await.unwrap_err();
        assert!(matches!(err, CatalogError::Upstream { status: 500, .. }));
    }

    #[test]
    fn one_pixel_placeholder_is_not_usable() {
        assert!(!ImageDimensions { width: 1, height: 1 }.is_usable());
        assert!(!ImageDimensions { width: 180, height: 1 }.is_usable());
        assert!(ImageDimensions { width: 2, height: 2 }.is_usable());
    }
}
