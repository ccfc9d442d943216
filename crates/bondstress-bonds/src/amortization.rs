//! Linear pull-to-par of a lot's book price.
//!
//! A lot bought at 99 with ten annual periods to maturity moves 0.1 towards
//! par each period: 99.1 after the first period, 100 after the tenth.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bondstress_core::{CoreError, Date};

use crate::error::{BondError, BondResult};

const PAR: Decimal = Decimal::ONE_HUNDRED;

/// Per-lot amortization schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// Book price the schedule starts from.
    pub book_price: Decimal,
    /// Whole periods between start and maturity (at least 1).
    pub total_periods: u32,
    /// Price change per period.
    pub change_per_period: Decimal,
}

impl AmortizationSchedule {
    /// Builds the schedule for a lot.
    ///
    /// `total_periods` counts whole periods of `period_length_years` between
    /// `start_date` and `maturity`, rounded down, with a minimum of one.
    ///
    /// # Errors
    ///
    /// Fails if `period_length_years` is not a positive finite number.
    pub fn compute(
        book_price: Decimal,
        maturity: Date,
        start_date: Date,
        period_length_years: f64,
    ) -> BondResult<Self> {
        if !period_length_years.is_finite() || period_length_years <= 0.0 {
            return Err(CoreError::InvalidPeriodLength {
                value: period_length_years,
            }
            .into());
        }

        let months = f64::from(start_date.months_between(&maturity).max(0));
        let periods = (months / (12.0 * period_length_years)).floor();
        let total_periods = (periods as u32).max(1);

        let change_per_period = (PAR - book_price) / Decimal::from(total_periods);

        Ok(Self {
            book_price,
            total_periods,
            change_per_period,
        })
    }

    /// Same as [`compute`](Self::compute) with an `f64` book price.
    pub fn compute_f64(
        book_price: f64,
        maturity: Date,
        start_date: Date,
        period_length_years: f64,
    ) -> BondResult<Self> {
        let book_price = Decimal::from_f64(book_price)
            .ok_or_else(|| BondError::invalid_price(format!("book price {book_price}")))?;
        Self::compute(book_price, maturity, start_date, period_length_years)
    }

    /// Book price after `period_index + 1` periods.
    ///
    /// Not capped at par: callers exclude periods past maturity.
    pub fn projected_book_price(&self, period_index: u32) -> Decimal {
        self.book_price + Decimal::from(period_index + 1) * self.change_per_period
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_ten_year_discount_lot() {
        let schedule =
            AmortizationSchedule::compute(dec!(99), date(2035, 4, 30), date(2025, 4, 30), 1.0)
                .unwrap();

        assert_eq!(schedule.total_periods, 10);
        assert_eq!(schedule.change_per_period, dec!(0.1));
        assert_eq!(schedule.projected_book_price(0), dec!(99.1));
        assert_eq!(schedule.projected_book_price(2), dec!(99.3));
        assert_eq!(schedule.projected_book_price(9), dec!(100.0));
    }

    #[test]
    fn test_premium_lot_amortizes_down() {
        let schedule =
            AmortizationSchedule::compute(dec!(104), date(2029, 4, 30), date(2025, 4, 30), 1.0)
                .unwrap();

        assert_eq!(schedule.total_periods, 4);
        assert_eq!(schedule.change_per_period, dec!(-1));
    }

    #[test]
    fn test_partial_periods_round_down() {
        // 9 years 11 months -> 9 whole years
        let schedule =
            AmortizationSchedule::compute(dec!(91), date(2035, 3, 31), date(2025, 4, 30), 1.0)
                .unwrap();
        assert_eq!(schedule.total_periods, 9);
        assert_eq!(schedule.change_per_period, dec!(1));

        // half-year periods
        let schedule =
            AmortizationSchedule::compute(dec!(98), date(2027, 4, 30), date(2025, 4, 30), 0.5)
                .unwrap();
        assert_eq!(schedule.total_periods, 4);
        assert_eq!(schedule.change_per_period, dec!(0.5));
    }

    #[test]
    fn test_minimum_one_period() {
        let schedule =
            AmortizationSchedule::compute(dec!(99.5), date(2025, 9, 30), date(2025, 4, 30), 1.0)
                .unwrap();
        assert_eq!(schedule.total_periods, 1);
        assert_eq!(schedule.change_per_period, dec!(0.5));

        // already matured
        let schedule =
            AmortizationSchedule::compute(dec!(99.5), date(2024, 1, 1), date(2025, 4, 30), 1.0)
                .unwrap();
        assert_eq!(schedule.total_periods, 1);
    }

    #[test]
    fn test_rejects_bad_period_length() {
        for bad in [0.0, -1.0, f64::NAN] {
            let result =
                AmortizationSchedule::compute(dec!(99), date(2035, 4, 30), date(2025, 4, 30), bad);
            assert!(matches!(result, Err(BondError::CoreError(_))));
        }
    }

    proptest! {
        #[test]
        fn schedule_reaches_par(
            book in 80.0f64..120.0,
            years in 1i32..30,
            extra_months in 0i32..12,
        ) {
            let start = date(2025, 4, 30);
            let maturity = start.add_months(years * 12 + extra_months).unwrap();
            let schedule = AmortizationSchedule::compute_f64(book, maturity, start, 1.0).unwrap();

            let total = (schedule.change_per_period * Decimal::from(schedule.total_periods))
                .to_f64()
                .unwrap();
            prop_assert!((total - (100.0 - book)).abs() < 1e-6);
        }
    }
}
