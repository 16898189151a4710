//! Additive edition scoring.
//!
//! | Signal                          | Points |
//! |---------------------------------|--------|
//! | non-sentinel cover              | 100    |
//! | ISBN-13 (else ISBN-10)          | 50 (30)|
//! | OCLC number                     | 20     |
//! | LCCN                            | 15     |
//! | page count                      | 10     |
//! | publisher                       | 5      |
//! | publish date                    | 5      |
//! | publish year after 1990         | `min(year - 1990, 30)` |
//!
//! The year is the first run of four digits in the publish date.

use crate::types::is_real_cover_id;
use crate::wire::RawEdition;

const COVER_POINTS: i32 = 100;
const ISBN_13_POINTS: i32 = 50;
const ISBN_10_POINTS: i32 = 30;
const OCLC_POINTS: i32 = 20;
const LCCN_POINTS: i32 = 15;
const PAGE_COUNT_POINTS: i32 = 10;
const PUBLISHER_POINTS: i32 = 5;
const PUBLISH_DATE_POINTS: i32 = 5;
const RECENCY_BASE_YEAR: i32 = 1990;
const RECENCY_CAP: i32 = 30;

/// An edition together with the score it won with.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEdition {
    pub edition: RawEdition,
    pub score: i32,
}

impl ScoredEdition {
    /// The edition's first non-sentinel cover id.
    pub fn cover_id(&self) -> Option<i64> {
        cover_id(&self.edition)
    }

    /// The edition key without its `/books/` prefix.
    pub fn edition_key(&self) -> Option<&str> {
        self.edition
            .key
            .as_deref()
            .map(|k| k.trim().trim_start_matches("/books/"))
            .filter(|k| !k.is_empty())
    }
}

/// Score one edition.
pub fn score_edition(edition: &RawEdition) -> i32 {
    let mut score = 0;
    if cover_id(edition).is_some() {
        score += COVER_POINTS;
    }
    if !edition.isbn_13.is_empty() {
        score += ISBN_13_POINTS;
    } else if !edition.isbn_10.is_empty() {
        score += ISBN_10_POINTS;
    }
    if !edition.oclc_numbers.is_empty() {
        score += OCLC_POINTS;
    }
    if !edition.lccn.is_empty() {
        score += LCCN_POINTS;
    }
    if edition.number_of_pages.is_some_and(|p| p > 0) {
        score += PAGE_COUNT_POINTS;
    }
    if !edition.publishers.is_empty() {
        score += PUBLISHER_POINTS;
    }
    if let Some(date) = publish_date(edition) {
        score += PUBLISH_DATE_POINTS;
        if let Some(year) = extract_year(date) {
            if year > RECENCY_BASE_YEAR {
                score += (year - RECENCY_BASE_YEAR).min(RECENCY_CAP);
            }
        }
    }
    score
}

/// Pick the highest-scoring keyed edition. The earliest entry wins ties.
pub fn select_best_edition(editions: Vec<RawEdition>) -> Option<ScoredEdition> {
    editions
        .into_iter()
        .filter(|e| e.key.as_deref().is_some_and(|k| !k.trim().is_empty()))
        .map(|edition| ScoredEdition {
            score: score_edition(&edition),
            edition,
        })
        .fold(None, |best: Option<ScoredEdition>, candidate| match best {
            Some(current) if current.score >= candidate.score => Some(current),
            _ => Some(candidate),
        })
}

/// First run of four consecutive ASCII digits, as a year.
pub fn extract_year(date: &str) -> Option<i32> {
    date.as_bytes()
        .windows(4)
        .find(|w| w.iter().all(u8::is_ascii_digit))
        .and_then(|w| std::str::from_utf8(w).ok())
        .and_then(|s| s.parse().ok())
}

fn cover_id(edition: &RawEdition) -> Option<i64> {
    edition.covers.first().copied().filter(|&id| is_real_cover_id(id))
}

fn publish_date(edition: &RawEdition) -> Option<&str> {
    edition
        .publish_date
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
}
