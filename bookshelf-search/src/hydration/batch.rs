//! Chunked batch hydration.
//!
//! Candidates are split into consecutive chunks of `hydration_concurrency`.
//! Chunks run strictly one after another with a short pause in between;
//! records within a chunk are hydrated concurrently and reported on the
//! event channel as each one finishes.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;

use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::CatalogConfig;
use crate::provider::CatalogProvider;
use crate::types::{BookRecord, HydrationOutcome};

use super::worker::hydrate_record;

/// Emitted once per processed record, as soon as its hydration settles.
#[derive(Debug, Clone, PartialEq)]
pub struct HydrationEvent {
    pub record: BookRecord,
    pub outcome: HydrationOutcome,
}

/// Hydrate every candidate in `records` and return the merged list.
///
/// Records that need no hydration come back untouched and in place.
/// A closed `events` receiver is ignored. Once `cancel` fires no further
/// chunk is started; records of skipped chunks are returned unchanged.
pub async fn hydrate_batch<P: CatalogProvider>(
    records: Vec<BookRecord>,
    provider: &P,
    config: &CatalogConfig,
    events: &mpsc::UnboundedSender<HydrationEvent>,
    cancel: &CancellationToken,
) -> Vec<BookRecord> {
    let candidates: Vec<BookRecord> = records
        .iter()
        .filter(|r| r.is_hydration_candidate())
        .cloned()
        .collect();
    if candidates.is_empty() {
        return records;
    }

    let chunk_size = config.hydration_concurrency.max(1);
    let chunk_count = candidates.len().div_ceil(chunk_size);
    let mut hydrated: HashMap<String, BookRecord> = HashMap::with_capacity(candidates.len());
    let mut failed = 0usize;

    for (index, chunk) in candidates.chunks(chunk_size).enumerate() {
        if cancel.is_cancelled() {
            tracing::debug!(chunk = index, "hydration cancelled before chunk");
            break;
        }

        let mut in_flight: FuturesUnordered<_> = chunk
            .iter()
            .cloned()
            .map(|record| hydrate_contained(provider, record, config.editions_limit))
            .collect();

        while let Some(record) = in_flight.next().await {
            if record.hydration_outcome == HydrationOutcome::Failed {
                failed += 1;
            }
            let _ = events.send(HydrationEvent {
                outcome: record.hydration_outcome,
                record: record.clone(),
            });
            hydrated.insert(record.work_key.clone(), record);
        }

        if index + 1 < chunk_count {
            tokio::time::sleep(config.chunk_pause()).await;
        }
    }

    tracing::info!(
        candidates = candidates.len(),
        processed = hydrated.len(),
        failed,
        "hydration batch settled"
    );

    records
        .into_iter()
        .map(|record| hydrated.remove(&record.work_key).unwrap_or(record))
        .collect()
}

/// Run one worker, turning a panic into a failed outcome.
async fn hydrate_contained<P: CatalogProvider>(
    provider: &P,
    record: BookRecord,
    editions_limit: usize,
) -> BookRecord {
    let fallback = record.clone();
    match AssertUnwindSafe(hydrate_record(provider, record, editions_limit))
        .catch_unwind()
        .await
    {
        Ok(record) => record,
        Err(_) => {
            tracing::warn!(work_key = %fallback.work_key, "hydration worker panicked");
            fallback.into_failed()
        }
    }
}
