//! Analytics view of a stored security.

use bondstress_core::{Date, Frequency};
use bondstress_curves::RateCurve;
use bondstress_traits::Security;

use crate::cashflows::{AccruedInterestCalculator, CashFlow, CouponSchedule};
use crate::error::BondResult;
use crate::pricing::{PresentValueEngine, YieldResult, YieldSolver};

/// Fixed coupon bullet bond terms used for valuation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedCouponBond {
    /// Annual coupon rate in percent.
    pub coupon_rate: f64,
    /// Coupon payments per year.
    pub frequency: Frequency,
    /// Final maturity.
    pub maturity: Date,
}

impl FixedCouponBond {
    /// Creates a bond from its terms.
    pub fn new(coupon_rate: f64, frequency: Frequency, maturity: Date) -> Self {
        Self {
            coupon_rate,
            frequency,
            maturity,
        }
    }

    /// True once `as_of` is on or after maturity.
    pub fn is_matured(&self, as_of: Date) -> bool {
        as_of >= self.maturity
    }

    /// Final payment per 100 par: principal plus the last coupon.
    pub fn redemption_amount(&self) -> f64 {
        100.0 + self.coupon_rate / f64::from(self.frequency.periods_per_year())
    }

    /// Remaining cash flows per 100 par after `valuation`.
    pub fn cash_flows(&self, valuation: Date) -> BondResult<Vec<CashFlow>> {
        CouponSchedule::new(self.maturity, self.frequency).cash_flows(valuation, self.coupon_rate)
    }

    /// Accrued interest per 100 par.
    pub fn accrued_interest(&self, as_of: Date) -> BondResult<f64> {
        AccruedInterestCalculator::accrued_interest(
            as_of,
            self.maturity,
            self.coupon_rate,
            self.frequency,
        )
    }

    /// Yield from a dirty price; sentinel on failure.
    pub fn yield_to_maturity(&self, solver: &YieldSolver, dirty_price: f64, as_of: Date) -> YieldResult {
        solver.solve_ytm(
            dirty_price,
            self.coupon_rate,
            as_of,
            self.maturity,
            self.frequency,
        )
    }

    /// Present value per 100 par against a curve.
    pub fn present_value(&self, valuation: Date, curve: &RateCurve) -> BondResult<f64> {
        PresentValueEngine::present_value(
            valuation,
            self.maturity,
            self.coupon_rate,
            curve,
            self.frequency,
        )
    }
}

impl From<&Security> for FixedCouponBond {
    fn from(security: &Security) -> Self {
        Self::new(security.coupon_rate, security.frequency, security.maturity)
    }
}
