//! Error types for the portfolio core.

use std::io;

use thiserror::Error;

/// Error type for portfolio core operations.
///
/// Scorers never produce these; they surface only from reference-table
/// loading and from the collaborator seams that materialize facts.
#[derive(Debug, Error)]
pub enum PortfolioError {
    /// An underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// A JSON document could not be parsed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// A reference table is missing or malformed. Fatal before any repository is processed.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Facts for a single repository could not be produced.
    #[error("repository {repository} unavailable: {reason}")]
    Unavailable {
        /// Repository identifier that failed.
        repository: String,
        /// Reason reported by the provider.
        reason: String,
    },
    /// A catch-all error with a message.
    #[error("{0}")]
    Other(String),
}

impl PortfolioError {
    /// Build a configuration error from any message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Build an unavailable-repository error.
    pub fn unavailable(repository: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            repository: repository.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience result type for the portfolio core.
pub type Result<T> = std::result::Result<T, PortfolioError>;
