//! Error types for the bookshelf front end.

use bookshelf_search::CatalogError;

/// Top-level error type for the command line front end.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Config file missing, unreadable or invalid.
    #[error("config error: {0}")]
    Config(String),

    /// The search itself failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Output could not be encoded.
    #[error("output error: {0}")]
    Output(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Message suitable for showing to the person at the terminal.
    pub fn user_message(&self) -> String {
        match self {
            Self::Catalog(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AppError>;
