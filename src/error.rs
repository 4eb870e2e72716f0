//! Crate-wide error type.
//!
//! Pure graph computation cannot fail on a well-formed snapshot, so every
//! variant here originates at a boundary: the SQLite store, the collaborator
//! that supplies graph data, configuration loading, or a cancelled query.

use thiserror::Error;

/// Errors surfaced by the social-graph library.
#[derive(Debug, Error)]
pub enum SocialGraphError {
    /// The underlying SQLite store rejected or failed a statement.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A graph-data collaborator could not be read. Never mapped to an
    /// empty result.
    #[error("failed to load graph data: {0}")]
    Collaborator(String),

    /// Invalid or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A long-running query observed its cancellation flag. Partial results
    /// are discarded.
    #[error("query cancelled")]
    Cancelled,
}

impl SocialGraphError {
    /// Wrap any displayable failure as a collaborator error.
    pub fn collaborator(err: impl std::fmt::Display) -> Self {
        Self::Collaborator(err.to_string())
    }

    /// `true` for [`SocialGraphError::Cancelled`].
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, SocialGraphError>;
