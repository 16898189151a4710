//! Cover candidate generation.
//!
//! Fallback order, first present identifier first:
//!
//! ```text
//! cover id → edition key → ISBN #1 → ISBN #2 → OCLC #1 → LCCN #1
//! ```
//!
//! Each step yields at most one URL of the form
//! `{covers_root}/b/{kind}/{value}-{size}.jpg`.

use std::fmt;

use crate::types::{is_real_cover_id, BookRecord, CoverSize};

/// Which identifier a cover URL was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoverSource {
    CoverId,
    EditionKey,
    PrimaryIsbn,
    SecondaryIsbn,
    Oclc,
    Lccn,
}

impl CoverSource {
    /// Path segment the cover host expects for this identifier kind.
    pub fn path_kind(&self) -> &'static str {
        match self {
            Self::CoverId => "id",
            Self::EditionKey => "olid",
            Self::PrimaryIsbn | Self::SecondaryIsbn => "isbn",
            Self::Oclc => "oclc",
            Self::Lccn => "lccn",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CoverId => "cover_id",
            Self::EditionKey => "edition_key",
            Self::PrimaryIsbn => "isbn_primary",
            Self::SecondaryIsbn => "isbn_secondary",
            Self::Oclc => "oclc",
            Self::Lccn => "lccn",
        }
    }
}

impl fmt::Display for CoverSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identifiers of one book that matter for cover lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoverIdentifiers<'a> {
    pub cover_id: Option<i64>,
    pub edition_key: Option<&'a str>,
    pub isbn: &'a [String],
    pub oclc: &'a [String],
    pub lccn: &'a [String],
    /// Used only as a cache key fallback.
    pub work_key: Option<&'a str>,
    /// Used only as a cache key fallback.
    pub title: Option<&'a str>,
}

impl<'a> From<&'a BookRecord> for CoverIdentifiers<'a> {
    fn from(record: &'a BookRecord) -> Self {
        Self {
            cover_id: record.cover_id,
            edition_key: record.cover_edition_key.as_deref(),
            isbn: &record.isbn,
            oclc: &record.oclc,
            lccn: &record.lccn,
            work_key: Some(record.work_key.as_str()),
            title: Some(record.title.as_str()),
        }
    }
}

/// One URL to try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverCandidate {
    pub source: CoverSource,
    pub url: String,
}

type Step = fn(&CoverIdentifiers<'_>) -> Option<String>;

const FALLBACK_ORDER: [(CoverSource, Step); 6] = [
    (CoverSource::CoverId, cover_id),
    (CoverSource::EditionKey, edition_key),
    (CoverSource::PrimaryIsbn, primary_isbn),
    (CoverSource::SecondaryIsbn, secondary_isbn),
    (CoverSource::Oclc, first_oclc),
    (CoverSource::Lccn, first_lccn),
];

fn cover_id(ids: &CoverIdentifiers<'_>) -> Option<String> {
    ids.cover_id
        .filter(|&id| is_real_cover_id(id))
        .map(|id| id.to_string())
}

fn edition_key(ids: &CoverIdentifiers<'_>) -> Option<String> {
    ids.edition_key.and_then(present)
}

fn primary_isbn(ids: &CoverIdentifiers<'_>) -> Option<String> {
    nth(ids.isbn, 0)
}

fn secondary_isbn(ids: &CoverIdentifiers<'_>) -> Option<String> {
    nth(ids.isbn, 1)
}

fn first_oclc(ids: &CoverIdentifiers<'_>) -> Option<String> {
    nth(ids.oclc, 0)
}

fn first_lccn(ids: &CoverIdentifiers<'_>) -> Option<String> {
    nth(ids.lccn, 0)
}

/// Build the candidate list in fallback order. Empty when the book has no
/// usable identifier.
pub fn candidates(
    ids: &CoverIdentifiers<'_>,
    covers_root: &str,
    size: CoverSize,
) -> Vec<CoverCandidate> {
    let root = covers_root.trim_end_matches('/');
    FALLBACK_ORDER
        .iter()
        .filter_map(|(source, step)| {
            step(ids).map(|value| CoverCandidate {
                source: *source,
                url: format!("{root}/b/{}/{value}-{size}.jpg", source.path_kind()),
            })
        })
        .collect()
}

fn present(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

fn nth(list: &[String], index: usize) -> Option<String> {
    list.get(index).and_then(|v| present(v))
}
