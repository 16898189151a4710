//! Raw JSON shapes returned by the catalog endpoints.
//!
//! Every field is optional on the wire; normalization into
//! [`BookRecord`](crate::types::BookRecord) happens in
//! [`catalog::normalize`](crate::catalog::normalize).

use serde::Deserialize;

/// Body of the search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSearchResponse {
    #[serde(default)]
    pub docs: Vec<RawDoc>,
    #[serde(default, rename = "numFound")]
    pub num_found: u64,
    #[serde(default)]
    pub start: u64,
}

/// One search hit, restricted to the requested field projection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDoc {
    pub key: Option<String>,
    pub title: Option<String>,
    pub author_name: Option<Vec<String>>,
    pub cover_i: Option<i64>,
    pub cover_edition_key: Option<String>,
    pub edition_count: Option<u32>,
    pub first_publish_year: Option<i32>,
    pub isbn: Option<Vec<String>>,
    pub oclc: Option<Vec<String>>,
    pub lccn: Option<Vec<String>>,
    pub publisher: Option<Vec<String>>,
    pub subject: Option<Vec<String>>,
    pub language: Option<Vec<String>>,
    pub number_of_pages_median: Option<u32>,
}

/// Body of the work detail endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkDetail {
    pub description: Option<TextValue>,
    #[serde(default)]
    pub subjects: Vec<String>,
}

impl WorkDetail {
    /// The description as plain text, whichever shape it arrived in.
    pub fn description_text(&self) -> Option<&str> {
        self.description
            .as_ref()
            .map(TextValue::as_str)
            .filter(|s| !s.trim().is_empty())
    }
}

/// The catalog sends some text fields either bare or as `{"value": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TextValue {
    Plain(String),
    Typed { value: String },
}

impl TextValue {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Plain(s) => s,
            Self::Typed { value } => value,
        }
    }
}

/// Body of the editions listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditionsResponse {
    #[serde(default)]
    pub entries: Vec<RawEdition>,
}

/// One published edition of a work.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawEdition {
    pub key: Option<String>,
    #[serde(default)]
    pub covers: Vec<i64>,
    #[serde(default)]
    pub isbn_13: Vec<String>,
    #[serde(default)]
    pub isbn_10: Vec<String>,
    #[serde(default)]
    pub oclc_numbers: Vec<String>,
    #[serde(default)]
    pub lccn: Vec<String>,
    pub number_of_pages: Option<u32>,
    #[serde(default)]
    pub publishers: Vec<String>,
    pub publish_date: Option<String>,
    pub physical_format: Option<String>,
}
