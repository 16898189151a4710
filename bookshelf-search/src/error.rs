//! Error types for the bookshelf-search crate.
//!
//! Every error carries a stable message suitable for logs and a separate
//! user-facing message for front ends. Errors are `Clone` so the session
//! snapshot can hold the last one.

/// Errors that can occur while querying the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The request exceeded its deadline.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// A provider endpoint answered with a non-2xx status.
    #[error("upstream returned HTTP {status}: {context}")]
    Upstream {
        /// The HTTP status code.
        status: u16,
        /// Which endpoint failed.
        context: String,
    },

    /// Transport-level failure, including unreadable response bodies.
    #[error("network error: {0}")]
    Network(String),

    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The query was rejected before any request was made.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl CatalogError {
    /// Message shown to the end user.
    ///
    /// Transport failures get retry-oriented wording; query problems are
    /// echoed verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::Timeout(_) => "Request timed out. Please try again.".to_owned(),
            Self::Upstream { .. } | Self::Network(_) => {
                "Failed to fetch books. Please check your internet connection and try again."
                    .to_owned()
            }
            Self::Config(msg) => format!("Configuration problem: {msg}"),
            Self::InvalidQuery(msg) => msg.clone(),
        }
    }

    /// Classify a [`reqwest::Error`] raised while talking to `context`.
    pub(crate) fn from_reqwest(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(format!("{context}: {err}"))
        } else if let Some(status) = err.status() {
            Self::Upstream {
                status: status.as_u16(),
                context: context.to_owned(),
            }
        } else {
            Self::Network(format!("{context}: {err}"))
        }
    }
}

/// Convenience type alias for bookshelf-search results.
pub type Result<T> = std::result::Result<T, CatalogError>;
