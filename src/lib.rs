//! Bookshelf: command line book catalog search.
//!
//! A thin front end over [`bookshelf_search`]:
//! query → ranked list → background hydration → optional cover lookup → output
//!
//! # Architecture
//!
//! - **Config**: optional TOML file with `[catalog]` and `[display]` tables
//! - **App**: drives one [`bookshelf_search::SessionController`] search to
//!   completion, following hydration progress on an `indicatif` bar
//! - **Render**: plain text listing or pretty JSON

pub mod app;
pub mod config;
pub mod error;
pub mod render;

pub use app::{SearchOptions, run_search};
pub use config::{BookshelfConfig, DisplayConfig};
pub use error::{AppError, Result};
