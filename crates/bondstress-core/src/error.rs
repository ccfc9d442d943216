//! Error types for core date and convention handling.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The error type for core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Unsupported coupon frequency.
    #[error("Invalid frequency: {periods_per_year} payments per year")]
    InvalidFrequency {
        /// The rejected number of payments per year.
        periods_per_year: u32,
    },

    /// Invalid period length for a projection or schedule.
    #[error("Invalid period length: {value} years")]
    InvalidPeriodLength {
        /// The rejected period length in years.
        value: f64,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }
}
