//! Present value of a bullet bond against a tenor-keyed rate curve.

use bondstress_core::{Date, Frequency};
use bondstress_curves::RateCurve;

use crate::cashflows::CouponSchedule;
use crate::error::BondResult;

/// Discounts remaining cash flows off a rate curve.
///
/// Each flow at 30/360 time `t` is discounted at the curve rate for `t`,
/// compounded at the bond's own frequency:
///
/// $$DF(t) = \left(1 + \frac{r(t)}{100 f}\right)^{-f t}$$
pub struct PresentValueEngine;

impl PresentValueEngine {
    /// Present value per 100 par. Zero once `valuation >= maturity`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bondstress_bonds::PresentValueEngine;
    /// use bondstress_core::{Date, Frequency};
    /// use bondstress_curves::RateCurve;
    ///
    /// let curve = RateCurve::new((1..=30).map(|t| (t, 5.0))).unwrap();
    /// let pv = PresentValueEngine::present_value(
    ///     Date::from_ymd(2025, 4, 30).unwrap(),
    ///     Date::from_ymd(2035, 4, 30).unwrap(),
    ///     5.0,
    ///     &curve,
    ///     Frequency::SemiAnnual,
    /// )
    /// .unwrap();
    /// // Flat curve at the coupon prices the bond at par on a coupon date
    /// assert!((pv - 100.0).abs() < 1e-9);
    /// ```
    pub fn present_value(
        valuation: Date,
        maturity: Date,
        coupon_rate: f64,
        curve: &RateCurve,
        frequency: Frequency,
    ) -> BondResult<f64> {
        if valuation >= maturity {
            return Ok(0.0);
        }

        let f = f64::from(frequency.periods_per_year());
        let flows = CouponSchedule::new(maturity, frequency).cash_flows(valuation, coupon_rate)?;

        Ok(flows
            .iter()
            .map(|cf| cf.amount * Self::discount_factor(curve.rate_at(cf.years), cf.years, f))
            .sum())
    }

    /// Discount factor for a rate (percent) at time `t` with `f` periods a year.
    #[must_use]
    pub fn discount_factor(rate: f64, t: f64, f: f64) -> f64 {
        (1.0 + rate / (100.0 * f)).powf(-f * t)
    }
}
