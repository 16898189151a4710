//! Cover resolution: ordered candidate URLs, verification, memoization.
//!
//! [`candidates`] is a pure decision table turning a record's identifiers
//! into cover URLs in fallback order. [`resolver::CoverResolver`] tries them
//! one at a time through a [`CoverInspector`](crate::provider::CoverInspector),
//! consulting an injected [`cache::CoverCache`] first.

pub mod cache;
pub mod candidates;
pub mod resolver;

pub use cache::CoverCache;
pub use candidates::{CoverCandidate, CoverIdentifiers, CoverSource};
pub use resolver::{CoverResolution, CoverResolver};
