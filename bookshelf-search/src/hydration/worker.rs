//! Single-record hydration.
//!
//! Never fails: every error is folded into the record's
//! [`HydrationOutcome`], so one bad work cannot abort a batch.

use crate::provider::CatalogProvider;
use crate::types::{BookRecord, HydrationOutcome};
use crate::wire::WorkDetail;

use super::scorer::{select_best_edition, ScoredEdition};

/// Hydrate one record from its work's editions.
///
/// Records that are not hydration candidates are returned untouched.
/// Otherwise the work detail and the first `editions_limit` editions are
/// fetched concurrently and the best edition is merged in. The returned
/// record is always settled: `is_hydrated` set, `needs_hydration` cleared.
pub async fn hydrate_record<P: CatalogProvider>(
    provider: &P,
    record: BookRecord,
    editions_limit: usize,
) -> BookRecord {
    if !record.is_hydration_candidate() {
        return record;
    }

    let (work, editions) = tokio::join!(
        provider.fetch_work(&record.work_key),
        provider.fetch_editions(&record.work_key, editions_limit),
    );

    let (work, mut editions) = match (work, editions) {
        (Ok(work), Ok(editions)) => (work, editions),
        (Err(err), _) | (_, Err(err)) => {
            tracing::warn!(work_key = %record.work_key, error = %err, "hydration fetch failed");
            return record.into_failed();
        }
    };
    editions.truncate(editions_limit);

    let mut record = record;
    match select_best_edition(editions) {
        Some(best) => {
            tracing::debug!(
                work_key = %record.work_key,
                edition = best.edition_key().unwrap_or_default(),
                score = best.score,
                had_cover = record.cover_id.is_some(),
                gained_cover = best.cover_id().is_some(),
                "hydrated from best edition"
            );
            merge_edition(&mut record, &best, &work);
            record.settle(HydrationOutcome::Success);
        }
        None => {
            tracing::debug!(work_key = %record.work_key, "no usable edition");
            record.settle(HydrationOutcome::NoBetterEdition);
        }
    }
    record
}

/// Overwrite the fields the edition and work actually supply; keep the rest.
fn merge_edition(record: &mut BookRecord, best: &ScoredEdition, work: &WorkDetail) {
    let edition = &best.edition;

    if let Some(cover_id) = best.cover_id() {
        record.cover_id = Some(cover_id);
    }
    if let Some(key) = best.edition_key() {
        record.cover_edition_key = Some(key.to_owned());
    }
    if !edition.isbn_13.is_empty() {
        record.isbn = edition.isbn_13.clone();
    } else if !edition.isbn_10.is_empty() {
        record.isbn = edition.isbn_10.clone();
    }
    replace_if_present(&mut record.oclc, &edition.oclc_numbers);
    replace_if_present(&mut record.lccn, &edition.lccn);
    replace_if_present(&mut record.publisher, &edition.publishers);
    if let Some(date) = edition.publish_date.as_deref().filter(|d| !d.trim().is_empty()) {
        record.publish_date = Some(date.trim().to_owned());
    }
    if let Some(pages) = edition.number_of_pages.filter(|&p| p > 0) {
        record.page_count = Some(pages);
    }
    if let Some(format) = edition.physical_format.as_deref().filter(|f| !f.trim().is_empty()) {
        record.physical_format = Some(format.trim().to_owned());
    }
    if let Some(description) = work.description_text() {
        record.description = Some(description.to_owned());
    }
    replace_if_present(&mut record.subjects, &work.subjects);
}

fn replace_if_present(target: &mut Vec<String>, supplied: &[String]) {
    if !supplied.is_empty() {
        *target = supplied.to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::types::SearchRequest;
    use crate::wire::{RawEdition, RawSearchResponse, TextValue};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct WorkCatalog {
        work: WorkDetail,
        editions: Vec<RawEdition>,
        work_status: Option<u16>,
        editions_status: Option<u16>,
        calls: AtomicUsize,
    }

    impl CatalogProvider for WorkCatalog {
        async fn search(&self, _request: &SearchRequest) -> Result<RawSearchResponse, CatalogError> {
            Ok(RawSearchResponse::default())
        }

        async fn fetch_work(&self, _work_key: &str) -> Result<WorkDetail, CatalogError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.work_status {
                Some(status) => Err(CatalogError::Upstream {
                    status,
                    context: "work detail".into(),
                }),
                None => Ok(self.work.clone()),
            }
        }

        async fn fetch_editions(
            &self,
            _work_key: &str,
            _limit: usize,
        ) -> Result<Vec<RawEdition>, CatalogError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.editions_status {
                Some(status) => Err(CatalogError::Upstream {
                    status,
                    context: "editions".into(),
                }),
                None => Ok(self.editions.clone()),
            }
        }
    }

    fn oclc_only_record() -> BookRecord {
        let mut record = BookRecord::new("OL1W", "Pamphlet");
        record.oclc = vec!["111".into()];
        record.publisher = vec!["Original Press".into()];
        record.page_count = Some(90);
        record
    }

    fn rich_edition() -> RawEdition {
        RawEdition {
            key: Some("/books/OL9M".into()),
            covers: vec![555],
            isbn_13: vec!["9780000000001".into()],
            oclc_numbers: vec!["222".into()],
            publish_date: Some("2001".into()),
            physical_format: Some("Paperback".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn best_edition_is_merged() {
        let catalog = WorkCatalog {
            work: WorkDetail {
                description: Some(TextValue::Typed {
                    value: "A story.".into(),
                }),
                subjects: vec!["Fiction".into()],
            },
            editions: vec![RawEdition {
                key: Some("/books/OL8M".into()),
                ..Default::default()
            }, rich_edition()],
            ..Default::default()
        };

        let record = hydrate_record(&catalog, oclc_only_record(), 50).await;

        assert_eq!(record.hydration_outcome, HydrationOutcome::Success);
        assert!(record.is_hydrated);
        assert!(!record.needs_hydration);
        assert_eq!(record.cover_id, Some(555));
        assert_eq!(record.cover_edition_key.as_deref(), Some("OL9M"));
        assert_eq!(record.isbn, vec!["9780000000001"]);
        assert_eq!(record.oclc, vec!["222"]);
        assert_eq!(record.publish_date.as_deref(), Some("2001"));
        assert_eq!(record.physical_format.as_deref(), Some("Paperback"));
        assert_eq!(record.description.as_deref(), Some("A story."));
        assert_eq!(record.subjects, vec!["Fiction"]);
    }

    #[tokio::test]
    async fn fields_the_edition_lacks_are_preserved() {
        let catalog = WorkCatalog {
            editions: vec![rich_edition()],
            ..Default::default()
        };
        let record = hydrate_record(&catalog, oclc_only_record(), 50).await;
        assert_eq!(record.publisher, vec!["Original Press"]);
        assert_eq!(record.page_count, Some(90));
        assert_eq!(record.lccn, Vec::<String>::new());
        assert!(record.description.is_none());
    }

    #[tokio::test]
    async fn no_keyed_edition_settles_as_no_better_edition() {
        let catalog = WorkCatalog {
            editions: vec![RawEdition {
                covers: vec![1],
                ..Default::default()
            }],
            ..Default::default()
        };
        let original = oclc_only_record();
        let record = hydrate_record(&catalog, original.clone(), 50).await;
        assert_eq!(record.hydration_outcome, HydrationOutcome::NoBetterEdition);
        assert!(record.is_hydrated);
        assert!(!record.needs_hydration);
        assert_eq!(record.cover_id, original.cover_id);
        assert_eq!(record.oclc, original.oclc);
    }

    #[tokio::test]
    async fn work_fetch_failure_settles_as_failed() {
        let catalog = WorkCatalog {
            work_status: Some(500),
            editions: vec![rich_edition()],
            ..Default::default()
        };
        let original = oclc_only_record();
        let record = hydrate_record(&catalog, original.clone(), 50).await;
        assert_eq!(record.hydration_outcome, HydrationOutcome::Failed);
        assert!(record.is_hydrated);
        assert!(!record.needs_hydration);
        assert_eq!(record.cover_id, None);
        assert_eq!(record.oclc, original.oclc);
    }

    #[tokio::test]
    async fn editions_fetch_failure_settles_as_failed() {
        let catalog = WorkCatalog {
            editions_status: Some(404),
            ..Default::default()
        };
        let record = hydrate_record(&catalog, oclc_only_record(), 50).await;
        assert_eq!(record.hydration_outcome, HydrationOutcome::Failed);
    }

    #[tokio::test]
    async fn records_not_needing_hydration_are_left_alone() {
        let catalog = WorkCatalog {
            editions: vec![rich_edition()],
            ..Default::default()
        };
        let mut covered = oclc_only_record();
        covered.cover_id = Some(1);
        covered.needs_hydration = false;

        let record = hydrate_record(&catalog, covered.clone(), 50).await;
        assert_eq!(record, covered);
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn editions_beyond_the_limit_are_ignored() {
        let mut editions: Vec<RawEdition> = (0..3)
            .map(|i| RawEdition {
                key: Some(format!("/books/OL{i}M")),
                ..Default::default()
            })
            .collect();
        editions.push(rich_edition());
        let catalog = WorkCatalog {
            editions,
            ..Default::default()
        };
        let record = hydrate_record(&catalog, oclc_only_record(), 3).await;
        assert_eq!(record.cover_edition_key.as_deref(), Some("OL0M"));
        assert_eq!(record.cover_id, None);
    }
}
