//! Error types for curve operations.

use bondstress_core::Date;
use bondstress_math::MathError;
use bondstress_traits::RepositoryError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// No points stored for the requested snapshot.
    #[error("No curve points for {curve_name} on {as_of}")]
    MissingData {
        /// Curve name.
        curve_name: String,
        /// Snapshot date.
        as_of: Date,
    },

    /// A shift references a tenor the curve does not have.
    #[error("Tenor {tenor}y not on curve (tenors: {available:?})")]
    UnknownTenor {
        /// The requested tenor.
        tenor: u32,
        /// Tenors present on the curve.
        available: Vec<u32>,
    },

    /// The same tenor was given twice.
    #[error("Duplicate tenor {tenor}y")]
    DuplicateTenor {
        /// The repeated tenor.
        tenor: u32,
    },

    /// A rate is NaN or infinite.
    #[error("Invalid rate {rate} at tenor {tenor}y")]
    InvalidRate {
        /// Tenor of the bad rate.
        tenor: u32,
        /// The bad rate.
        rate: f64,
    },

    /// Interpolation failed.
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] MathError),

    /// Storage failure other than missing data.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl CurveError {
    /// Creates a missing data error.
    #[must_use]
    pub fn missing_data(curve_name: impl Into<String>, as_of: Date) -> Self {
        Self::MissingData {
            curve_name: curve_name.into(),
            as_of,
        }
    }
}
