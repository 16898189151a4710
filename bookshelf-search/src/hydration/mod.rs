//! Background hydration: upgrade records that lack a cover identifier.
//!
//! For each candidate record the worker fetches the work and its editions,
//! the scorer picks the best edition, and its fields are merged back. The
//! batch coordinator runs workers in fixed-size concurrent chunks and
//! reports every settled record on a channel as soon as it settles.

pub mod batch;
pub mod scorer;
pub mod worker;

pub use batch::{hydrate_batch, HydrationEvent};
pub use scorer::{select_best_edition, ScoredEdition};
pub use worker::hydrate_record;
