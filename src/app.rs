//! One search, start to finish: query, wait for hydration, resolve covers,
//! render.

use std::sync::Arc;

use bookshelf_search::covers::CoverIdentifiers;
use bookshelf_search::{
    BookRecord, CatalogConfig, CoverCache, CoverResolver, CoverSize, OpenLibraryClient,
    SearchType, SessionController, SessionSnapshot,
};
use futures_util::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{AppError, Result};
use crate::render;

/// What to search for and how to show it.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub query: String,
    pub search_type: SearchType,
    /// Resolve and print a verified cover URL per record.
    pub covers: bool,
    pub cover_size: CoverSize,
    pub json: bool,
    /// Draw a hydration progress bar on stderr.
    pub show_progress: bool,
}

/// Run a search to completion and return the rendered output.
///
/// # Errors
///
/// [`AppError::Catalog`] if the search failed or the query was blank,
/// [`AppError::Config`] for invalid settings.
pub async fn run_search(options: &SearchOptions, config: &CatalogConfig) -> Result<String> {
    config
        .validate()
        .map_err(|e| AppError::Config(e.to_string()))?;
    let client = OpenLibraryClient::new(config)?;
    let session = SessionController::new(client.clone(), config.clone());

    session.search(&options.query, options.search_type).await;
    let snapshot = wait_for_hydration(&session, options.show_progress).await;
    if let Some(err) = snapshot.error.clone() {
        return Err(err.into());
    }
    tracing::info!(
        shown = snapshot.records.len(),
        total_found = snapshot.total_found,
        "search complete"
    );

    let covers = if options.covers {
        resolve_covers(client, config, &snapshot.records, options.cover_size).await
    } else {
        Vec::new()
    };

    if options.json {
        render::render_json(&snapshot, &covers)
    } else {
        Ok(render::render_text(&snapshot, &covers))
    }
}

/// Follow the session until nothing is in flight, mirroring hydration
/// progress on a progress bar.
async fn wait_for_hydration<P>(session: &SessionController<P>, show_progress: bool) -> SessionSnapshot
where
    P: bookshelf_search::CatalogProvider + 'static,
{
    let mut rx = session.subscribe();
    let mut bar: Option<ProgressBar> = None;

    loop {
        let snapshot = rx.borrow_and_update().clone();
        if show_progress && snapshot.is_hydrating {
            let pb = bar.get_or_insert_with(|| progress_bar(snapshot.progress.total as u64));
            pb.set_position(snapshot.progress.completed as u64);
        }
        if snapshot.is_settled() {
            if let Some(pb) = bar {
                pb.finish_and_clear();
            }
            return snapshot;
        }
        if rx.changed().await.is_err() {
            if let Some(pb) = bar {
                pb.finish_and_clear();
            }
            return session.snapshot();
        }
    }
}

fn progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::with_template("  upgrading covers [{bar:30}] {pos}/{len}") {
        pb.set_style(style);
    }
    pb
}

/// Resolve covers for all records concurrently; each record's own fallback
/// chain stays sequential.
async fn resolve_covers(
    client: OpenLibraryClient,
    config: &CatalogConfig,
    records: &[BookRecord],
    size: CoverSize,
) -> Vec<Option<String>> {
    let cache = Arc::new(CoverCache::new(config.cover_cache_capacity));
    let resolver = CoverResolver::new(client, cache, config);
    join_all(records.iter().map(|record| {
        let resolver = &resolver;
        async move {
            resolver
                .resolve(&CoverIdentifiers::from(record), size)
                .await
                .url()
                .map(str::to_owned)
        }
    }))
    .await
}
