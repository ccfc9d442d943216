//! Hybrid root-finding algorithm.
//!
//! Newton-Raphson with a bisection safety net.

use crate::error::MathResult;
use crate::solvers::{bisection, newton_raphson, SolverConfig, SolverResult};

/// Hybrid root-finding algorithm.
///
/// Runs Newton-Raphson from `initial_guess`. If Newton fails (zero
/// derivative, divergence, iteration budget) or lands outside `bounds`,
/// bisection is run over `bounds` with the same configuration.
///
/// # Example
///
/// ```rust
/// use bondstress_math::solvers::{hybrid, SolverConfig};
///
/// let f = |x: f64| x * x * x - x - 2.0;
/// let df = |x: f64| 3.0 * x * x - 1.0;
///
/// let result = hybrid(f, df, 1.5, (1.0, 2.0), &SolverConfig::default()).unwrap();
/// assert!(f(result.root).abs() < 1e-9);
/// ```
pub fn hybrid<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    bounds: (f64, f64),
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let (lo, hi) = (bounds.0.min(bounds.1), bounds.0.max(bounds.1));

    match newton_raphson(&f, &df, initial_guess, config) {
        Ok(result) if result.root >= lo && result.root <= hi => Ok(result),
        Ok(result) => {
            log::debug!(
                "Newton root {} outside [{lo}, {hi}], falling back to bisection",
                result.root
            );
            bisection(&f, lo, hi, config)
        }
        Err(err) => {
            log::debug!("Newton failed ({err}), falling back to bisection");
            bisection(&f, lo, hi, config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hybrid_uses_newton_when_it_converges() {
        let f = |x: f64| x * x - 2.0;
        let df = |x: f64| 2.0 * x;

        let result = hybrid(f, df, 1.5, (0.0, 2.0), &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
        assert!(result.iterations < 10);
    }

    #[test]
    fn test_hybrid_falls_back_on_zero_derivative() {
        let f = |x: f64| x * x * x - x - 2.0;
        let df = |_x: f64| 0.0;

        let result = hybrid(f, df, 1.5, (1.0, 2.0), &SolverConfig::default()).unwrap();
        assert_relative_eq!(f(result.root), 0.0, epsilon = 1e-8);
    }

    #[test]
    fn test_hybrid_errors_without_bracket() {
        let f = |x: f64| x * x + 1.0;
        let df = |x: f64| 2.0 * x;

        assert!(hybrid(f, df, 0.0, (-1.0, 1.0), &SolverConfig::default()).is_err());
    }
}
