//! Bounded in-memory cache of verified cover URLs.
//!
//! Keys are built from a book's identifiers (cover id, edition key, first
//! ISBN, first OCLC, first LCCN, joined with `|`), falling back to the work
//! key and then the title. When full, the oldest inserted entry is evicted.
//!
//! The cache is an ordinary value: the owner creates it and hands it to the
//! [`CoverResolver`](super::CoverResolver), so each test can use a fresh one.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use super::candidates::{CoverIdentifiers, CoverSource};

/// A cover URL that passed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCover {
    pub url: String,
    pub source: CoverSource,
}

#[derive(Debug, Default)]
struct Entries {
    map: HashMap<String, ResolvedCover>,
    order: VecDeque<String>,
}

/// FIFO-bounded map from identifier key to verified cover.
#[derive(Debug)]
pub struct CoverCache {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl CoverCache {
    /// Create an empty cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(Entries::default()),
        }
    }

    /// Look up a verified cover.
    pub fn get(&self, key: &str) -> Option<ResolvedCover> {
        self.lock().map.get(key).cloned()
    }

    /// Store a verified cover, evicting the oldest entry when full.
    /// Re-inserting an existing key replaces its value in place.
    pub fn insert(&self, key: String, cover: ResolvedCover) {
        let mut entries = self.lock();
        if let Some(existing) = entries.map.get_mut(&key) {
            *existing = cover;
            return;
        }
        if entries.map.len() >= self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                entries.map.remove(&oldest);
            }
        }
        entries.order.push_back(key.clone());
        entries.map.insert(key, cover);
    }

    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Entries> {
        // A panic while holding the lock cannot leave the map and the
        // order queue out of step, so a poisoned guard is still usable.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Composite cache key for a book, or `None` if it has nothing to key on.
pub fn cache_key(ids: &CoverIdentifiers<'_>) -> Option<String> {
    let cover_id = ids.cover_id.map(|id| id.to_string());
    let parts: Vec<&str> = [
        cover_id.as_deref(),
        ids.edition_key,
        ids.isbn.first().map(String::as_str),
        ids.oclc.first().map(String::as_str),
        ids.lccn.first().map(String::as_str),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect();

    if !parts.is_empty() {
        return Some(parts.join("|"));
    }
    ids.work_key
        .or(ids.title)
        .filter(|fallback| !fallback.is_empty())
        .map(str::to_owned)
}
