//! # Bondstress Math
//!
//! Numerical building blocks for bond valuation.
//!
//! - **Solvers**: Newton-Raphson, bisection, and a hybrid that falls back
//!   from Newton to bisection
//! - **Interpolation**: Linear interpolation with flat extrapolation, used
//!   for rate curves keyed by tenor

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]

pub mod error;
pub mod interpolation;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{Interpolator, LinearInterpolator};
    pub use crate::solvers::{bisection, hybrid, newton_raphson, SolverConfig, SolverResult};
}

pub use error::{MathError, MathResult};
