//! Error types for bond operations.

use thiserror::Error;

/// A specialized Result type for bond operations.
pub type BondResult<T> = Result<T, BondError>;

/// Errors that can occur during bond operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BondError {
    /// Yield calculation failed to converge.
    #[error("Yield calculation failed to converge after {iterations} iterations")]
    YieldConvergenceFailed {
        /// Number of iterations attempted.
        iterations: u32,
    },

    /// Invalid price.
    #[error("Invalid price: {reason}")]
    InvalidPrice {
        /// Description of what's invalid.
        reason: String,
    },

    /// No cash flows remain after the valuation date.
    #[error("Valuation date {valuation} is on or after maturity {maturity}")]
    ValuationAfterMaturity {
        /// Valuation date.
        valuation: String,
        /// Maturity date.
        maturity: String,
    },

    /// Core library error.
    #[error("Core error: {0}")]
    CoreError(#[from] bondstress_core::CoreError),

    /// Curve error.
    #[error("Curve error: {0}")]
    CurveError(#[from] bondstress_curves::CurveError),
}

impl BondError {
    /// Creates an invalid price error.
    #[must_use]
    pub fn invalid_price(reason: impl Into<String>) -> Self {
        Self::InvalidPrice {
            reason: reason.into(),
        }
    }
}
