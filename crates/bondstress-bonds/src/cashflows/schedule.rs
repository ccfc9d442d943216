//! Coupon schedule generation.

use bondstress_core::daycounts::{DayCount, Thirty360US};
use bondstress_core::{Date, Frequency};
use serde::{Deserialize, Serialize};

use crate::error::BondResult;

/// A single future payment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    /// Payment date.
    pub date: Date,
    /// 30/360 US year fraction from the valuation date.
    pub years: f64,
    /// Amount per 100 par (coupon, plus 100 at maturity).
    pub amount: f64,
}

/// Coupon dates of a bullet bond, generated backward from maturity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CouponSchedule {
    maturity: Date,
    frequency: Frequency,
}

impl CouponSchedule {
    /// Creates a schedule for a bond maturing on `maturity`.
    pub fn new(maturity: Date, frequency: Frequency) -> Self {
        Self {
            maturity,
            frequency,
        }
    }

    /// The k-th coupon date counting back from maturity (k = 0 is maturity).
    ///
    /// Each date is offset from maturity directly, so month-end clamping
    /// never drifts across periods.
    fn nth_back(&self, k: u32) -> BondResult<Date> {
        let months = (k * self.frequency.months_per_period()) as i32;
        Ok(self.maturity.add_months(-months)?)
    }

    /// Coupon dates strictly after `valuation`, ascending. Empty once
    /// `valuation >= maturity`.
    pub fn dates_after(&self, valuation: Date) -> BondResult<Vec<Date>> {
        let mut dates = Vec::new();
        let mut k = 0;
        loop {
            let date = self.nth_back(k)?;
            if date <= valuation {
                break;
            }
            dates.push(date);
            k += 1;
        }
        dates.reverse();
        Ok(dates)
    }

    /// Last coupon date on or before `as_of` and the next one after it.
    ///
    /// Only meaningful for `as_of < maturity`.
    pub fn surrounding(&self, as_of: Date) -> BondResult<(Date, Date)> {
        let mut next = self.maturity;
        let mut k = 1;
        loop {
            let previous = self.nth_back(k)?;
            if previous <= as_of {
                return Ok((previous, next));
            }
            next = previous;
            k += 1;
        }
    }

    /// Remaining cash flows per 100 par after `valuation`.
    pub fn cash_flows(&self, valuation: Date, coupon_rate: f64) -> BondResult<Vec<CashFlow>> {
        let coupon = coupon_rate / f64::from(self.frequency.periods_per_year());
        let dc = Thirty360US;

        Ok(self
            .dates_after(valuation)?
            .into_iter()
            .map(|date| {
                let principal = if date == self.maturity { 100.0 } else { 0.0 };
                CashFlow {
                    date,
                    years: dc.year_fraction(valuation, date),
                    amount: coupon + principal,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_dates_after_semi_annual() {
        let schedule = CouponSchedule::new(date(2027, 4, 30), Frequency::SemiAnnual);
        let dates = schedule.dates_after(date(2025, 6, 15)).unwrap();

        assert_eq!(
            dates,
            vec![
                date(2025, 10, 30),
                date(2026, 4, 30),
                date(2026, 10, 30),
                date(2027, 4, 30)
            ]
        );
    }

    #[test]
    fn test_dates_after_excludes_valuation_coupon() {
        let schedule = CouponSchedule::new(date(2026, 4, 30), Frequency::SemiAnnual);
        let dates = schedule.dates_after(date(2025, 4, 30)).unwrap();

        assert_eq!(dates, vec![date(2025, 10, 30), date(2026, 4, 30)]);
    }

    #[test]
    fn test_no_dates_at_or_after_maturity() {
        let schedule = CouponSchedule::new(date(2026, 4, 30), Frequency::Quarterly);

        assert!(schedule.dates_after(date(2026, 4, 30)).unwrap().is_empty());
        assert!(schedule.dates_after(date(2027, 1, 1)).unwrap().is_empty());
    }

    #[test]
    fn test_month_end_maturity_does_not_drift() {
        let schedule = CouponSchedule::new(date(2026, 8, 31), Frequency::SemiAnnual);
        let dates = schedule.dates_after(date(2025, 6, 1)).unwrap();

        assert_eq!(dates, vec![date(2025, 8, 31), date(2026, 2, 28), date(2026, 8, 31)]);
    }

    #[test]
    fn test_surrounding_coupons() {
        let schedule = CouponSchedule::new(date(2035, 4, 30), Frequency::SemiAnnual);

        let (last, next) = schedule.surrounding(date(2025, 7, 15)).unwrap();
        assert_eq!(last, date(2025, 4, 30));
        assert_eq!(next, date(2025, 10, 30));

        let (last, next) = schedule.surrounding(date(2025, 4, 30)).unwrap();
        assert_eq!(last, date(2025, 4, 30));
        assert_eq!(next, date(2025, 10, 30));
    }

    #[test]
    fn test_cash_flows_amounts_and_times() {
        let schedule = CouponSchedule::new(date(2026, 4, 30), Frequency::SemiAnnual);
        let flows = schedule.cash_flows(date(2025, 4, 30), 5.0).unwrap();

        assert_eq!(flows.len(), 2);
        assert_relative_eq!(flows[0].amount, 2.5);
        assert_relative_eq!(flows[0].years, 0.5);
        assert_relative_eq!(flows[1].amount, 102.5);
        assert_relative_eq!(flows[1].years, 1.0);
    }
}
