//! # bookshelf-search
//!
//! Book catalog search with background hydration.
//!
//! A search returns in two stages. The initial query is filtered,
//! normalized, de-duplicated by work and ranked so that records with a
//! usable cover identifier come first; that list is shown immediately.
//! Records that lack a cover id and an edition key are then hydrated in the
//! background: the best edition of each work is picked by an additive score
//! and merged in, and the front end is told about each record as it lands.
//!
//! ## Design
//!
//! - [`CatalogProvider`] and [`CoverInspector`] are the only I/O seams; the
//!   Open Library client implements both
//! - [`SessionController`] owns the observable state and discards
//!   responses from superseded searches by session token
//! - Hydration runs in fixed-size concurrent chunks and never fails as a
//!   whole: a broken work settles as [`HydrationOutcome::Failed`]
//! - Covers are resolved through an ordered identifier fallback chain,
//!   memoized in a bounded [`CoverCache`]
//!
//! ## Logging
//!
//! Search terms are logged only at trace level.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod covers;
pub mod error;
pub mod http;
pub mod hydration;
pub mod provider;
pub mod providers;
pub mod session;
pub mod types;
pub mod wire;

pub use config::CatalogConfig;
pub use covers::{CoverCache, CoverResolution, CoverResolver, CoverSource};
pub use error::{CatalogError, Result};
pub use provider::{CatalogProvider, CoverInspector, ImageDimensions};
pub use providers::OpenLibraryClient;
pub use session::{HydrationProgress, SessionController, SessionPhase, SessionSnapshot};
pub use types::{
    BookRecord, CoverSize, HydrationOutcome, IdentifierCoverage, SearchPage, SearchRequest,
    SearchType,
};

/// Run one ranked search against Open Library, without hydration.
///
/// # Errors
///
/// [`CatalogError::Config`] if `config` is invalid,
/// [`CatalogError::InvalidQuery`] for a blank query, and the provider's
/// errors otherwise.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> bookshelf_search::Result<()> {
/// use bookshelf_search::{CatalogConfig, SearchType};
///
/// let page = bookshelf_search::search("dune", SearchType::Title, &CatalogConfig::default()).await?;
/// for book in &page.records {
///     println!("{} ({})", book.title, book.author_names.join(", "));
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, search_type: SearchType, config: &CatalogConfig) -> Result<SearchPage> {
    config.validate()?;
    let request = catalog::search::build_request(query, search_type, config)?;
    let client = OpenLibraryClient::new(config)?;
    catalog::search::orchestrate_search(&client, &request, config).await
}

/// [`search`] by title with [`CatalogConfig::default()`].
///
/// # Errors
///
/// Same as [`search`].
pub async fn search_default(query: &str) -> Result<SearchPage> {
    search(query, SearchType::Title, &CatalogConfig::default()).await
}
