//! Accrued interest calculations for bonds.
//!
//! # Example
//!
//! ```rust
//! use bondstress_bonds::cashflows::AccruedInterestCalculator;
//! use bondstress_core::{Date, Frequency};
//!
//! // 5% semi-annual, halfway through the coupon period
//! let accrued = AccruedInterestCalculator::accrued_interest(
//!     Date::from_ymd(2025, 7, 30).unwrap(),
//!     Date::from_ymd(2035, 4, 30).unwrap(),
//!     5.0,
//!     Frequency::SemiAnnual,
//! )
//! .unwrap();
//! assert!((accrued - 1.25).abs() < 1e-12);
//! ```

use bondstress_core::daycounts::{DayCount, Thirty360US};
use bondstress_core::{Date, Frequency};

use super::schedule::CouponSchedule;
use crate::error::BondResult;

/// Calculator for accrued interest on the 30/360 US basis.
pub struct AccruedInterestCalculator;

impl AccruedInterestCalculator {
    /// Accrued interest per 100 par at `as_of`.
    ///
    /// Coupon dates are rolled backward from `maturity`. The elapsed
    /// fraction is the 30/360 day count from the last coupon to `as_of` over
    /// the day count of the whole period.
    ///
    /// Zero on a coupon date and on or after maturity; never more than one
    /// full coupon (`coupon_rate / frequency`).
    pub fn accrued_interest(
        as_of: Date,
        maturity: Date,
        coupon_rate: f64,
        frequency: Frequency,
    ) -> BondResult<f64> {
        if as_of >= maturity {
            return Ok(0.0);
        }

        let (last_coupon, next_coupon) =
            CouponSchedule::new(maturity, frequency).surrounding(as_of)?;
        Ok(Self::standard(
            as_of,
            last_coupon,
            next_coupon,
            coupon_rate,
            frequency,
        ))
    }

    /// Accrued interest per 100 par given the surrounding coupon dates.
    #[must_use]
    pub fn standard(
        as_of: Date,
        last_coupon: Date,
        next_coupon: Date,
        coupon_rate: f64,
        frequency: Frequency,
    ) -> f64 {
        let dc = Thirty360US;
        let accrual_days = dc.day_count(last_coupon, as_of);
        let period_days = dc.day_count(last_coupon, next_coupon);

        if accrual_days <= 0 || period_days <= 0 {
            return 0.0;
        }

        let fraction = (accrual_days as f64 / period_days as f64).min(1.0);
        coupon_rate / f64::from(frequency.periods_per_year()) * fraction
    }
}
