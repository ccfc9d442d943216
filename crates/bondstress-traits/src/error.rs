//! Error types for storage operations.

use thiserror::Error;

/// A specialized Result type for storage operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors returned by storage backends.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Nothing stored under the requested key.
    #[error("no {entity} found for {key}")]
    MissingData {
        /// Kind of record looked up (e.g. "curve points").
        entity: String,
        /// Rendered lookup key.
        key: String,
    },

    /// Write would overwrite an immutable or append-only record.
    #[error("{entity} already exists for {key}")]
    Conflict {
        /// Kind of record written.
        entity: String,
        /// Rendered key of the existing record.
        key: String,
    },

    /// Backend failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl RepositoryError {
    /// Creates a missing data error.
    #[must_use]
    pub fn missing(entity: impl Into<String>, key: impl ToString) -> Self {
        Self::MissingData {
            entity: entity.into(),
            key: key.to_string(),
        }
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict(entity: impl Into<String>, key: impl ToString) -> Self {
        Self::Conflict {
            entity: entity.into(),
            key: key.to_string(),
        }
    }

    /// Returns true for [`RepositoryError::MissingData`].
    #[must_use]
    pub fn is_missing_data(&self) -> bool {
        matches!(self, Self::MissingData { .. })
    }
}
