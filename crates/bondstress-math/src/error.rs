//! Errors raised by the solvers and the interpolator.

use thiserror::Error;

/// Result alias for this crate.
pub type MathResult<T> = Result<T, MathError>;

/// Solver and interpolation failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// The iteration budget ran out before the tolerance was met.
    #[error("no root after {iterations} iterations, |f| = {residual:.3e}")]
    NoConvergence {
        /// Iterations spent.
        iterations: u32,
        /// |f| at the last iterate.
        residual: f64,
    },

    /// The function has the same sign at both ends of the interval.
    #[error("root not bracketed: f({lower}) and f({upper}) share a sign")]
    NoSignChange {
        /// Lower end of the interval.
        lower: f64,
        /// Upper end of the interval.
        upper: f64,
    },

    /// Newton hit a derivative too close to zero to step from.
    #[error("derivative {value:e} is too flat for a Newton step")]
    FlatDerivative {
        /// The offending derivative.
        value: f64,
    },

    /// An interpolation table needs at least one point.
    #[error("interpolation table is empty")]
    EmptyTable,

    /// Malformed arguments.
    #[error("{0}")]
    InvalidInput(String),
}

impl MathError {
    pub(crate) fn no_convergence(iterations: u32, residual: f64) -> Self {
        Self::NoConvergence {
            iterations,
            residual,
        }
    }

    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }
}
