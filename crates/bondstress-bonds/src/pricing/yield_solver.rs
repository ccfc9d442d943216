//! Yield-to-maturity solver.
//!
//! Solves for the periodically compounded yield `y` (percent) such that
//!
//! $$\sum_i CF_i \left(1 + \frac{y}{100 f}\right)^{-f t_i} = P_{dirty}$$
//!
//! where `t_i` is the 30/360 US year fraction to each remaining cash flow.

use bondstress_core::{Date, Frequency};
use bondstress_math::solvers::{hybrid, SolverConfig};

use crate::cashflows::{CashFlow, CouponSchedule};
use crate::error::{BondError, BondResult};

/// Yield returned when the solver gives up, in percent.
pub const DEFAULT_SENTINEL_YIELD: f64 = 1e-7;

/// Bracket searched by the bisection fallback, in percent.
const YIELD_BRACKET: (f64, f64) = (-99.0, 1000.0);

/// Result of a yield calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldResult {
    /// The calculated yield in percent (5.0 for 5%).
    pub yield_value: f64,
    /// Number of iterations to converge.
    pub iterations: u32,
    /// Final price residual.
    pub residual: f64,
    /// True when `yield_value` is the sentinel, not a solved root.
    pub fallback: bool,
}

/// Yield-to-maturity solver.
///
/// Newton-Raphson with the analytic derivative first, bisection over a wide
/// bracket when Newton fails.
#[derive(Debug, Clone)]
pub struct YieldSolver {
    config: SolverConfig,
    sentinel: f64,
}

impl Default for YieldSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl YieldSolver {
    /// Creates a new yield solver with default settings.
    ///
    /// Default tolerance: 1e-10
    /// Default max iterations: 100
    /// Default sentinel yield: 1e-7
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SolverConfig::default(),
            sentinel: DEFAULT_SENTINEL_YIELD,
        }
    }

    /// Sets the solver tolerance on the price residual.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config = self.config.with_tolerance(tolerance);
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.config = self.config.with_max_iterations(max_iterations);
        self
    }

    /// Sets the yield reported when solving fails.
    #[must_use]
    pub fn with_sentinel(mut self, sentinel: f64) -> Self {
        self.sentinel = sentinel;
        self
    }

    /// The yield reported when solving fails.
    pub fn sentinel(&self) -> f64 {
        self.sentinel
    }

    /// Solves for yield, never failing.
    ///
    /// On any failure the sentinel yield is returned with `fallback` set and
    /// a warning is logged.
    pub fn solve_ytm(
        &self,
        dirty_price: f64,
        coupon_rate: f64,
        valuation: Date,
        maturity: Date,
        frequency: Frequency,
    ) -> YieldResult {
        match self.try_solve_ytm(dirty_price, coupon_rate, valuation, maturity, frequency) {
            Ok(result) => result,
            Err(e) => {
                log::warn!(
                    "yield solve failed (price {dirty_price}, coupon {coupon_rate}, {valuation} -> {maturity}): {e}; using sentinel {}",
                    self.sentinel
                );
                YieldResult {
                    yield_value: self.sentinel,
                    iterations: 0,
                    residual: f64::NAN,
                    fallback: true,
                }
            }
        }
    }

    /// Solves for yield, reporting failure as an error.
    ///
    /// # Errors
    ///
    /// - [`BondError::ValuationAfterMaturity`] when no cash flows remain
    /// - [`BondError::InvalidPrice`] for a non-positive or non-finite price
    /// - [`BondError::YieldConvergenceFailed`] when both methods fail
    pub fn try_solve_ytm(
        &self,
        dirty_price: f64,
        coupon_rate: f64,
        valuation: Date,
        maturity: Date,
        frequency: Frequency,
    ) -> BondResult<YieldResult> {
        if !dirty_price.is_finite() || dirty_price <= 0.0 {
            return Err(BondError::invalid_price(format!(
                "dirty price must be positive, got {dirty_price}"
            )));
        }

        let flows = CouponSchedule::new(maturity, frequency).cash_flows(valuation, coupon_rate)?;
        if flows.is_empty() {
            return Err(BondError::ValuationAfterMaturity {
                valuation: valuation.to_string(),
                maturity: maturity.to_string(),
            });
        }

        let f = f64::from(frequency.periods_per_year());

        // Current yield as a starting point
        let initial_guess = (coupon_rate * 100.0 / dirty_price).clamp(0.0, 50.0);

        let objective = |y: f64| pv_at_yield(&flows, y, f) - dirty_price;
        let derivative = |y: f64| pv_derivative(&flows, y, f);

        let result = hybrid(objective, derivative, initial_guess, YIELD_BRACKET, &self.config)
            .map_err(|_| BondError::YieldConvergenceFailed {
                iterations: self.config.max_iterations,
            })?;

        Ok(YieldResult {
            yield_value: result.root,
            iterations: result.iterations,
            residual: result.residual,
            fallback: false,
        })
    }

    /// Dirty price per 100 at a given yield (percent).
    pub fn dirty_price_from_yield(
        &self,
        yield_rate: f64,
        coupon_rate: f64,
        valuation: Date,
        maturity: Date,
        frequency: Frequency,
    ) -> BondResult<f64> {
        let flows = CouponSchedule::new(maturity, frequency).cash_flows(valuation, coupon_rate)?;
        Ok(pv_at_yield(
            &flows,
            yield_rate,
            f64::from(frequency.periods_per_year()),
        ))
    }
}

/// Present value of the flows at yield `y` (percent), periodic compounding.
fn pv_at_yield(flows: &[CashFlow], y: f64, f: f64) -> f64 {
    let base = 1.0 + y / (100.0 * f);
    flows
        .iter()
        .map(|cf| cf.amount * base.powf(-f * cf.years))
        .sum()
}

/// Derivative of [`pv_at_yield`] with respect to `y`.
fn pv_derivative(flows: &[CashFlow], y: f64, f: f64) -> f64 {
    let base = 1.0 + y / (100.0 * f);
    flows
        .iter()
        .map(|cf| -cf.years * cf.amount * base.powf(-f * cf.years - 1.0) / 100.0)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_par_bond_yields_coupon() {
        let solver = YieldSolver::new();
        let result = solver.solve_ytm(
            100.0,
            5.0,
            date(2025, 4, 30),
            date(2035, 4, 30),
            Frequency::SemiAnnual,
        );

        assert!(!result.fallback);
        assert_relative_eq!(result.yield_value, 5.0, epsilon = 1e-8);
    }

    #[test]
    fn test_discount_bond_yields_above_coupon() {
        let solver = YieldSolver::new();
        let result = solver.solve_ytm(
            99.0,
            5.0,
            date(2025, 4, 30),
            date(2035, 4, 30),
            Frequency::SemiAnnual,
        );

        assert!(!result.fallback);
        assert!(result.yield_value > 5.0);
        assert!(result.yield_value < 5.2);
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let flows = CouponSchedule::new(date(2030, 4, 30), Frequency::Quarterly)
            .cash_flows(date(2025, 6, 10), 4.0)
            .unwrap();
        let h = 1e-6;
        let numeric = (pv_at_yield(&flows, 4.5 + h, 4.0) - pv_at_yield(&flows, 4.5 - h, 4.0)) / (2.0 * h);
        assert_relative_eq!(pv_derivative(&flows, 4.5, 4.0), numeric, epsilon = 1e-5);
    }

    #[test]
    fn test_sentinel_on_matured_bond() {
        let solver = YieldSolver::new();
        let result = solver.solve_ytm(
            100.0,
            5.0,
            date(2035, 4, 30),
            date(2035, 4, 30),
            Frequency::SemiAnnual,
        );

        assert!(result.fallback);
        assert_eq!(result.yield_value, DEFAULT_SENTINEL_YIELD);
    }

    #[test]
    fn test_strict_variant_reports_errors() {
        let solver = YieldSolver::new();

        let err = solver
            .try_solve_ytm(
                100.0,
                5.0,
                date(2036, 1, 1),
                date(2035, 4, 30),
                Frequency::SemiAnnual,
            )
            .unwrap_err();
        assert!(matches!(err, BondError::ValuationAfterMaturity { .. }));

        let err = solver
            .try_solve_ytm(
                -1.0,
                5.0,
                date(2025, 4, 30),
                date(2035, 4, 30),
                Frequency::SemiAnnual,
            )
            .unwrap_err();
        assert!(matches!(err, BondError::InvalidPrice { .. }));
    }

    #[test]
    fn test_unreachable_price_falls_back() {
        // No yield inside the bracket discounts the flows up to this price
        let solver = YieldSolver::new().with_sentinel(-1.0);
        let result = solver.solve_ytm(
            1.0e9,
            5.0,
            date(2025, 4, 30),
            date(2026, 4, 30),
            Frequency::SemiAnnual,
        );

        assert!(result.fallback);
        assert_eq!(result.yield_value, -1.0);
        assert_eq!(solver.sentinel(), -1.0);
    }

    proptest! {
        #[test]
        fn yield_round_trip(
            ytm in 0.5f64..12.0,
            coupon in 0.0f64..10.0,
            offset in 0i64..1500,
            freq in prop::sample::select(vec![1u32, 2, 4, 12]),
        ) {
            let frequency = Frequency::try_from(freq).unwrap();
            let valuation = date(2025, 1, 15).add_days(offset);
            let maturity = date(2035, 4, 30);
            let solver = YieldSolver::new();

            let price = solver
                .dirty_price_from_yield(ytm, coupon, valuation, maturity, frequency)
                .unwrap();
            let solved = solver.solve_ytm(price, coupon, valuation, maturity, frequency);

            prop_assert!(!solved.fallback);
            prop_assert!((solved.yield_value - ytm).abs() < 1e-6);
        }
    }
}
