//! Bond pricing: yield to maturity and curve present value.

mod present_value;
mod yield_solver;

pub use present_value::PresentValueEngine;
pub use yield_solver::{YieldResult, YieldSolver, DEFAULT_SENTINEL_YIELD};
