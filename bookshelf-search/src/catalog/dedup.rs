//! Record de-duplication by work key.
//!
//! The work key is the join key used to merge hydration results back, so
//! it must be unique within one result set. The catalog occasionally
//! repeats a work; the first occurrence wins and later copies are dropped
//! with provider order otherwise preserved.

use std::collections::HashSet;

use crate::types::BookRecord;

/// Drop records whose work key was already seen.
pub fn deduplicate(records: Vec<BookRecord>) -> Vec<BookRecord> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    let before = records.len();

    let unique: Vec<BookRecord> = records
        .into_iter()
        .filter(|record| seen.insert(record.work_key.clone()))
        .collect();

    if unique.len() < before {
        tracing::debug!(dropped = before - unique.len(), "duplicate work keys dropped");
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_occurrence_wins() {
        let mut first = BookRecord::new("OL1W", "First");
        first.edition_count = 7;
        let records = vec![
            first,
            BookRecord::new("OL2W", "Other"),
            BookRecord::new("OL1W", "Repeat"),
        ];

        let unique = deduplicate(records);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].title, "First");
        assert_eq!(unique[0].edition_count, 7);
        assert_eq!(unique[1].work_key, "OL2W");
    }

    #[test]
    fn distinct_keys_are_untouched() {
        let records: Vec<BookRecord> = (0..5)
            .map(|i| BookRecord::new(format!("OL{i}W"), format!("Book {i}")))
            .collect();
        let unique = deduplicate(records.clone());
        assert_eq!(unique, records);
    }

    #[test]
    fn empty_input_returns_empty() {
        assert!(deduplicate(vec![]).is_empty());
    }
}
