//! Text and JSON rendering of a settled session.

use std::fmt::Write as _;

use bookshelf_search::{BookRecord, HydrationOutcome, IdentifierCoverage, SessionSnapshot};
use serde::Serialize;

use crate::error::{AppError, Result};

/// One rendered book: the record plus its resolved cover, if any.
#[derive(Debug, Serialize)]
struct JsonBook<'a> {
    #[serde(flatten)]
    record: &'a BookRecord,
    cover_url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    total_found: u64,
    shown: usize,
    notice: Option<&'a str>,
    coverage: IdentifierCoverage,
    records: Vec<JsonBook<'a>>,
}

/// Render a human-readable listing.
///
/// `covers` is indexed like `snapshot.records`; pass an empty slice when
/// covers were not resolved.
pub fn render_text(snapshot: &SessionSnapshot, covers: &[Option<String>]) -> String {
    let mut out = String::new();
    if let Some(notice) = &snapshot.notice {
        let _ = writeln!(out, "{notice}");
        return out;
    }

    let hydrated = snapshot
        .records
        .iter()
        .filter(|r| r.hydration_outcome == HydrationOutcome::Success)
        .count();
    let _ = writeln!(
        out,
        "Showing {} of {} matches ({} upgraded in background)",
        snapshot.records.len(),
        snapshot.total_found,
        hydrated
    );

    for (index, record) in snapshot.records.iter().enumerate() {
        let _ = writeln!(out);
        let _ = write!(out, "{:>2}. {} by {}", index + 1, record.title, record.author_names.join(", "));
        if let Some(year) = record.first_publish_year {
            let _ = write!(out, " ({year})");
        }
        let _ = writeln!(out);

        let mut details = Vec::new();
        if let Some(publisher) = record.publisher.first() {
            details.push(publisher.clone());
        }
        if let Some(date) = &record.publish_date {
            details.push(date.clone());
        }
        if let Some(format) = &record.physical_format {
            details.push(format.clone());
        }
        if let Some(pages) = record.page_count {
            details.push(format!("{pages} pages"));
        }
        if record.edition_count > 1 {
            details.push(format!("{} editions", record.edition_count));
        }
        if !details.is_empty() {
            let _ = writeln!(out, "    {}", details.join(" · "));
        }
        if let Some(isbn) = record.isbn.first() {
            let _ = writeln!(out, "    ISBN {isbn}");
        }
        if let Some(Some(url)) = covers.get(index) {
            let _ = writeln!(out, "    cover: {url}");
        } else if !covers.is_empty() {
            let _ = writeln!(out, "    cover: none");
        }
    }

    let coverage = IdentifierCoverage::from_records(&snapshot.records);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", coverage_line(&coverage));
    out
}

/// Render the session as pretty JSON.
///
/// # Errors
///
/// Returns [`AppError::Output`] if serialization fails.
pub fn render_json(snapshot: &SessionSnapshot, covers: &[Option<String>]) -> Result<String> {
    let report = JsonReport {
        total_found: snapshot.total_found,
        shown: snapshot.records.len(),
        notice: snapshot.notice.as_deref(),
        coverage: IdentifierCoverage::from_records(&snapshot.records),
        records: snapshot
            .records
            .iter()
            .enumerate()
            .map(|(index, record)| JsonBook {
                record,
                cover_url: covers.get(index).and_then(|c| c.as_deref()),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&report).map_err(|e| AppError::Output(e.to_string()))
}

fn coverage_line(coverage: &IdentifierCoverage) -> String {
    format!(
        "identifiers: {}/{} with any (cover id {}, edition {}, ISBN {}, OCLC {}, LCCN {})",
        coverage.with_any_identifier,
        coverage.total,
        coverage.with_cover_id,
        coverage.with_edition_key,
        coverage.with_isbn,
        coverage.with_oclc,
        coverage.with_lccn
    )
}
