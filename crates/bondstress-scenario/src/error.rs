//! Scenario engine error types.

use bondstress_bonds::BondError;
use bondstress_core::CoreError;
use bondstress_curves::CurveError;
use bondstress_traits::RepositoryError;
use thiserror::Error;

/// A specialized Result type for scenario operations.
pub type ScenarioResult<T> = Result<T, ScenarioError>;

/// Errors raised while valuing positions or running a stress scenario.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScenarioError {
    /// Required input is absent.
    #[error("missing {entity}: {key}")]
    MissingData {
        /// Kind of record that is missing.
        entity: String,
        /// Rendered lookup key.
        key: String,
    },

    /// Malformed scenario or curve definition.
    #[error("invalid scenario {key}: {message}")]
    Validation {
        /// Rendered key of the offending row or record.
        key: String,
        /// What is wrong with it.
        message: String,
    },

    /// Storage failure other than a missing key.
    #[error("repository error: {0}")]
    Repository(RepositoryError),

    /// Curve construction failure.
    #[error("curve error: {0}")]
    Curve(CurveError),

    /// Bond analytics failure.
    #[error("bond error: {0}")]
    Bond(#[from] BondError),

    /// Date arithmetic failure.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Background task failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ScenarioError {
    /// Creates a missing data error.
    #[must_use]
    pub fn missing(entity: impl Into<String>, key: impl ToString) -> Self {
        Self::MissingData {
            entity: entity.into(),
            key: key.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(key: impl ToString, message: impl Into<String>) -> Self {
        Self::Validation {
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// Returns true for [`ScenarioError::MissingData`].
    #[must_use]
    pub fn is_missing_data(&self) -> bool {
        matches!(self, Self::MissingData { .. })
    }

    /// Returns true for [`ScenarioError::Validation`].
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

impl From<RepositoryError> for ScenarioError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::MissingData { entity, key } => Self::MissingData { entity, key },
            other => Self::Repository(other),
        }
    }
}

impl From<CurveError> for ScenarioError {
    fn from(e: CurveError) -> Self {
        match e {
            CurveError::MissingData { curve_name, as_of } => {
                Self::missing("curve points", format!("{curve_name}@{as_of}"))
            }
            CurveError::Repository(inner) => inner.into(),
            other => Self::Curve(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bondstress_core::Date;

    #[test]
    fn test_missing_data_passes_through() {
        let err: ScenarioError = RepositoryError::missing("positions", "USIG01@2025-05-20").into();
        assert_eq!(
            err,
            ScenarioError::missing("positions", "USIG01@2025-05-20")
        );
        assert!(err.is_missing_data());

        let as_of = Date::from_ymd(2025, 4, 30).unwrap();
        let err: ScenarioError = CurveError::missing_data("USD_SWAP", as_of).into();
        assert_eq!(err.to_string(), "missing curve points: USD_SWAP@2025-04-30");
    }

    #[test]
    fn test_other_errors_keep_source() {
        let err: ScenarioError = RepositoryError::Storage("disk full".into()).into();
        assert!(matches!(err, ScenarioError::Repository(_)));

        let err: ScenarioError = CurveError::DuplicateTenor { tenor: 5 }.into();
        assert!(matches!(err, ScenarioError::Curve(_)));
        assert!(!err.is_validation());
    }
}
