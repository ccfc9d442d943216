//! Ingestion error types.

use bondstress_traits::RepositoryError;
use thiserror::Error;

/// A specialized Result type for ingestion.
pub type IngestResult<T> = Result<T, IngestError>;

/// Errors raised while parsing or loading tabular input.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Header row lacks required columns.
    #[error("missing columns: {}", columns.join(", "))]
    MissingColumns {
        /// Required columns not present.
        columns: Vec<String>,
    },

    /// A data row could not be converted.
    #[error("line {line}: {message}")]
    InvalidRow {
        /// 1-based line number including the header.
        line: usize,
        /// What is wrong with the row.
        message: String,
    },

    /// Rows are individually valid but inconsistent as a set.
    #[error("invalid {entity} {key}: {message}")]
    Validation {
        /// Kind of record.
        entity: String,
        /// Rendered key.
        key: String,
        /// What is wrong with it.
        message: String,
    },

    /// Malformed CSV.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// File access failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage rejected the batch.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl IngestError {
    /// Creates an invalid row error.
    #[must_use]
    pub fn invalid_row(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidRow {
            line,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(
        entity: impl Into<String>,
        key: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        Self::Validation {
            entity: entity.into(),
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// True for errors caused by the input itself rather than storage.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::Repository(RepositoryError::Storage(_)))
    }
}
