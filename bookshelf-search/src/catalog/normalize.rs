//! Raw search document → [`BookRecord`].
//!
//! A document is kept only if it has a non-blank title, a work key, and at
//! least one of {author, ISBN, OCLC}. Survivors are normalized to the
//! record defaults: unknown author placeholder, non-positive cover id mapped
//! to `None`, empty identifier lists, edition count of at least 1.

use crate::types::{is_real_cover_id, BookRecord, HydrationOutcome, UNKNOWN_AUTHOR};
use crate::wire::RawDoc;

const WORK_KEY_PREFIX: &str = "/works/";

/// Whether a raw document carries enough metadata to be shown.
pub fn is_displayable(doc: &RawDoc) -> bool {
    let has_title = doc.title.as_deref().is_some_and(|t| !t.trim().is_empty());
    let has_key = doc.key.as_deref().is_some_and(|k| !strip_work_prefix(k).is_empty());
    has_title
        && has_key
        && (non_empty(&doc.author_name) || non_empty(&doc.isbn) || non_empty(&doc.oclc))
}

/// Normalize a displayable document. Returns `None` for documents that
/// fail [`is_displayable`].
pub fn normalize(doc: RawDoc) -> Option<BookRecord> {
    if !is_displayable(&doc) {
        return None;
    }
    let work_key = strip_work_prefix(doc.key.as_deref()?).to_owned();
    let title = doc.title.as_deref()?.trim().to_owned();

    let cover_id = doc.cover_i.filter(|&id| is_real_cover_id(id));
    let cover_edition_key = doc.cover_edition_key.filter(|k| !k.trim().is_empty());
    let needs_hydration = cover_id.is_none() && cover_edition_key.is_none();

    let author_names = match doc.author_name {
        Some(names) if !names.is_empty() => names,
        _ => vec![UNKNOWN_AUTHOR.to_owned()],
    };

    Some(BookRecord {
        work_key,
        title,
        author_names,
        cover_id,
        cover_edition_key,
        isbn: doc.isbn.unwrap_or_default(),
        oclc: doc.oclc.unwrap_or_default(),
        lccn: doc.lccn.unwrap_or_default(),
        edition_count: doc.edition_count.filter(|&n| n > 0).unwrap_or(1),
        first_publish_year: doc.first_publish_year,
        publisher: doc.publisher.unwrap_or_default(),
        page_count: doc.number_of_pages_median,
        description: None,
        subjects: doc.subject.unwrap_or_default(),
        languages: doc.language.unwrap_or_default(),
        publish_date: None,
        physical_format: None,
        needs_hydration,
        is_hydrated: false,
        hydration_outcome: HydrationOutcome::Pending,
    })
}

/// Filter and normalize a whole response, preserving provider order.
pub fn normalize_all(docs: Vec<RawDoc>) -> Vec<BookRecord> {
    docs.into_iter().filter_map(normalize).collect()
}

fn strip_work_prefix(key: &str) -> &str {
    key.trim().trim_start_matches(WORK_KEY_PREFIX)
}

fn non_empty(list: &Option<Vec<String>>) -> bool {
    list.as_ref().is_some_and(|l| !l.is_empty())
}
