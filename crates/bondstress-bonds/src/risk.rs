//! Stored risk metrics for a bond at a valuation date.

use bondstress_core::Date;
use bondstress_curves::RateCurve;
use bondstress_traits::RiskMetrics;

use crate::bond::FixedCouponBond;
use crate::error::BondResult;
use crate::pricing::YieldSolver;

/// Computes the metric set stored for baseline and scenario valuations.
pub struct RiskCalculator;

impl RiskCalculator {
    /// Metrics for `bond` priced at `clean_price` on `as_of`.
    ///
    /// - accrued interest on the 30/360 US basis
    /// - yield from the dirty price (`clean_price` + accrued), with the
    ///   solver's sentinel on failure
    /// - present value against `curve`
    /// - OAS fixed at zero
    ///
    /// On the maturity date itself no flows remain to discount or solve
    /// against: the bond is worth its redemption amount and the yield is
    /// reported as zero without a fallback.
    pub fn calculate(
        bond: &FixedCouponBond,
        clean_price: f64,
        as_of: Date,
        curve: &RateCurve,
        solver: &YieldSolver,
    ) -> BondResult<RiskMetrics> {
        if as_of == bond.maturity {
            return Ok(RiskMetrics {
                price: clean_price,
                accrued_interest: 0.0,
                yield_to_maturity: 0.0,
                ytm_fallback: false,
                discounted_pv: bond.redemption_amount(),
                oas: 0.0,
            });
        }

        let accrued_interest = bond.accrued_interest(as_of)?;
        let ytm = bond.yield_to_maturity(solver, clean_price + accrued_interest, as_of);
        let discounted_pv = bond.present_value(as_of, curve)?;

        Ok(RiskMetrics {
            price: clean_price,
            accrued_interest,
            yield_to_maturity: ytm.yield_value,
            ytm_fallback: ytm.fallback,
            discounted_pv,
            oas: 0.0,
        })
    }
}
