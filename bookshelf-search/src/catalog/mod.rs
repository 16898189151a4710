//! Initial search: query, filter, normalize, de-duplicate, rank.
//!
//! This module turns one raw provider response into the immediately
//! displayable record list. Records with a usable cover identifier are
//! ranked first; the rest are flagged for background hydration.

pub mod dedup;
pub mod normalize;
pub mod ranking;
pub mod search;
