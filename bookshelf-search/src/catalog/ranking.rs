//! Cover-availability ranking for the initial result list.
//!
//! Stable sort, in priority order:
//!
//! 1. records not needing hydration before records needing it
//! 2. records with a cover id before records without
//! 3. higher edition count first
//! 4. later first-publish year first (absent counts as 0)
//!
//! Records equal on every key keep their provider order.

use std::cmp::Ordering;

use crate::types::BookRecord;

/// Compare two records by display priority.
pub fn compare(a: &BookRecord, b: &BookRecord) -> Ordering {
    a.needs_hydration
        .cmp(&b.needs_hydration)
        .then_with(|| b.cover_id.is_some().cmp(&a.cover_id.is_some()))
        .then_with(|| b.edition_count.cmp(&a.edition_count))
        .then_with(|| {
            b.first_publish_year
                .unwrap_or(0)
                .cmp(&a.first_publish_year.unwrap_or(0))
        })
}

/// Sort by display priority and keep at most `max_results`.
pub fn rank(mut records: Vec<BookRecord>, max_results: usize) -> Vec<BookRecord> {
    records.sort_by(compare);
    records.truncate(max_results);
    records
}
