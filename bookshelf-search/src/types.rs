//! Core types: book records, search selectors and hydration status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Author placeholder used when the catalog lists no author.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Cover id the catalog uses to mean "no cover".
pub const NO_COVER_SENTINEL: i64 = -1;

/// Whether a catalog cover id points at a real image. The catalog marks
/// missing covers with [`NO_COVER_SENTINEL`] and occasionally with `0`.
pub fn is_real_cover_id(id: i64) -> bool {
    id > 0
}

/// Result of the background hydration pass for one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HydrationOutcome {
    /// Not hydrated yet (or never needed).
    #[default]
    Pending,
    /// A better edition was found and merged in.
    Success,
    /// The work had no usable edition.
    NoBetterEdition,
    /// Fetching the work or its editions failed.
    Failed,
}

impl HydrationOutcome {
    /// Stable lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::NoBetterEdition => "no_better_edition",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for HydrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A search result, normalized from the catalog's raw document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Identifier of the logical work, without the `/works/` prefix.
    /// Unique within one result set; the join key for hydration merges.
    pub work_key: String,
    /// Trimmed, non-empty title.
    pub title: String,
    /// Author names, or `[UNKNOWN_AUTHOR]` when the catalog has none.
    pub author_names: Vec<String>,
    /// Direct cover id. Always positive.
    pub cover_id: Option<i64>,
    /// Edition key usable for cover lookup (OLID).
    pub cover_edition_key: Option<String>,
    pub isbn: Vec<String>,
    pub oclc: Vec<String>,
    pub lccn: Vec<String>,
    /// Number of editions of this work, at least 1.
    pub edition_count: u32,
    pub first_publish_year: Option<i32>,
    pub publisher: Vec<String>,
    pub page_count: Option<u32>,
    pub description: Option<String>,
    pub subjects: Vec<String>,
    pub languages: Vec<String>,
    /// Free-form publish date of the merged edition.
    pub publish_date: Option<String>,
    /// Physical format of the merged edition ("Paperback", ...).
    pub physical_format: Option<String>,
    /// True iff the record had neither a cover id nor an edition key at ingestion.
    pub needs_hydration: bool,
    /// Flips to true exactly once, when hydration settles for this record.
    pub is_hydrated: bool,
    pub hydration_outcome: HydrationOutcome,
}

impl BookRecord {
    /// Create a record with the given key and title and every other field
    /// at its ingestion default.
    pub fn new(work_key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            work_key: work_key.into(),
            title: title.into(),
            author_names: vec![UNKNOWN_AUTHOR.to_owned()],
            cover_id: None,
            cover_edition_key: None,
            isbn: Vec::new(),
            oclc: Vec::new(),
            lccn: Vec::new(),
            edition_count: 1,
            first_publish_year: None,
            publisher: Vec::new(),
            page_count: None,
            description: None,
            subjects: Vec::new(),
            languages: Vec::new(),
            publish_date: None,
            physical_format: None,
            needs_hydration: true,
            is_hydrated: false,
            hydration_outcome: HydrationOutcome::Pending,
        }
    }

    /// Whether any identifier usable for a cover lookup is present.
    pub fn has_cover_identifier(&self) -> bool {
        self.cover_id.is_some()
            || self.cover_edition_key.is_some()
            || !self.isbn.is_empty()
            || !self.oclc.is_empty()
            || !self.lccn.is_empty()
    }

    /// Whether the batch coordinator should pick this record up.
    pub fn is_hydration_candidate(&self) -> bool {
        self.needs_hydration && !self.is_hydrated
    }

    /// Settle this record as a failed hydration, leaving its data untouched.
    pub fn into_failed(mut self) -> Self {
        self.settle(HydrationOutcome::Failed);
        self
    }

    pub(crate) fn settle(&mut self, outcome: HydrationOutcome) {
        self.is_hydrated = true;
        self.needs_hydration = false;
        self.hydration_outcome = outcome;
    }
}

/// Which catalog field the query is restricted to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Title,
    Author,
    Subject,
    Isbn,
    Publisher,
    /// Free-text query over all fields.
    Any,
}

impl SearchType {
    /// Parse a selector name. Unrecognized names fall back to [`SearchType::Any`].
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "title" => Self::Title,
            "author" => Self::Author,
            "subject" => Self::Subject,
            "isbn" => Self::Isbn,
            "publisher" => Self::Publisher,
            _ => Self::Any,
        }
    }

    /// Query parameter the catalog expects for this selector.
    pub fn param_key(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Subject => "subject",
            Self::Isbn => "isbn",
            Self::Publisher => "publisher",
            Self::Any => "q",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Any => "any",
            other => other.param_key(),
        };
        f.write_str(name)
    }
}

/// Size class of a cover image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoverSize {
    /// Small thumbnail.
    S,
    /// Medium, the list-view default.
    #[default]
    M,
    /// Large, for detail views.
    L,
}

impl CoverSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
        }
    }
}

impl fmt::Display for CoverSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One search request as sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchRequest {
    /// Trimmed query term.
    pub query: String,
    pub search_type: SearchType,
    /// Result window requested from the provider.
    pub limit: usize,
}

/// Ranked output of the initial search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Filtered, normalized, ranked and truncated records.
    pub records: Vec<BookRecord>,
    /// The provider's total hit count before filtering.
    pub total_found: u64,
    /// Offset of this page in the provider's result list.
    pub start: u64,
}

/// How many records in a list carry each kind of cover identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IdentifierCoverage {
    pub total: usize,
    pub with_cover_id: usize,
    pub with_edition_key: usize,
    pub with_isbn: usize,
    pub with_oclc: usize,
    pub with_lccn: usize,
    pub with_any_identifier: usize,
}

impl IdentifierCoverage {
    /// Tally identifier coverage over `records`.
    pub fn from_records(records: &[BookRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, r| {
            acc.total += 1;
            acc.with_cover_id += usize::from(r.cover_id.is_some());
            acc.with_edition_key += usize::from(r.cover_edition_key.is_some());
            acc.with_isbn += usize::from(!r.isbn.is_empty());
            acc.with_oclc += usize::from(!r.oclc.is_empty());
            acc.with_lccn += usize::from(!r.lccn.is_empty());
            acc.with_any_identifier += usize::from(r.has_cover_identifier());
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_has_ingestion_defaults() {
        let record = BookRecord::new("OL1W", "Dune");
        assert_eq!(record.author_names, vec![UNKNOWN_AUTHOR]);
        assert_eq!(record.edition_count, 1);
        assert!(record.needs_hydration);
        assert!(!record.is_hydrated);
        assert_eq!(record.hydration_outcome, HydrationOutcome::Pending);
        assert!(!record.has_cover_identifier());
    }

    #[test]
    fn into_failed_settles_without_touching_data() {
        let mut record = BookRecord::new("OL1W", "Dune");
        record.oclc = vec!["123".into()];
        let failed = record.clone().into_failed();
        assert!(failed.is_hydrated);
        assert!(!failed.needs_hydration);
        assert_eq!(failed.hydration_outcome, HydrationOutcome::Failed);
        assert_eq!(failed.oclc, record.oclc);
        assert_eq!(failed.title, record.title);
    }

    #[test]
    fn hydration_candidate_requires_need_and_not_hydrated() {
        let mut record = BookRecord::new("OL1W", "Dune");
        assert!(record.is_hydration_candidate());
        record.is_hydrated = true;
        assert!(!record.is_hydration_candidate());
        record.is_hydrated = false;
        record.needs_hydration = false;
        assert!(!record.is_hydration_candidate());
    }

    #[test]
    fn search_type_parse_falls_back_to_any() {
        assert_eq!(SearchType::parse("Author"), SearchType::Author);
        assert_eq!(SearchType::parse(" isbn "), SearchType::Isbn);
        assert_eq!(SearchType::parse("genre"), SearchType::Any);
        assert_eq!(SearchType::parse(""), SearchType::Any);
    }

    #[test]
    fn search_type_param_keys() {
        assert_eq!(SearchType::Title.param_key(), "title");
        assert_eq!(SearchType::Publisher.param_key(), "publisher");
        assert_eq!(SearchType::Any.param_key(), "q");
        assert_eq!(SearchType::Any.to_string(), "any");
    }

    #[test]
    fn hydration_outcome_serializes_snake_case() {
        let json = serde_json::to_string(&HydrationOutcome::NoBetterEdition).expect("serialize");
        assert_eq!(json, "\"no_better_edition\"");
    }

    #[test]
    fn identifier_coverage_counts_each_kind() {
        let mut with_cover = BookRecord::new("OL1W", "A");
        with_cover.cover_id = Some(42);
        let mut with_isbn = BookRecord::new("OL2W", "B");
        with_isbn.isbn = vec!["9780000000000".into()];
        with_isbn.lccn = vec!["2001012345".into()];
        let bare = BookRecord::new("OL3W", "C");

        let coverage = IdentifierCoverage::from_records(&[with_cover, with_isbn, bare]);
        assert_eq!(coverage.total, 3);
        assert_eq!(coverage.with_cover_id, 1);
        assert_eq!(coverage.with_isbn, 1);
        assert_eq!(coverage.with_lccn, 1);
        assert_eq!(coverage.with_edition_key, 0);
        assert_eq!(coverage.with_any_identifier, 2);
    }
}
