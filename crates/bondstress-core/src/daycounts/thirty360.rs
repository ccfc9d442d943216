//! 30/360 US day count convention.

use super::DayCount;
use crate::types::Date;

/// 30/360 US day count convention (Bond Basis).
///
/// # Rules
///
/// 1. If D1 is the last day of February, change D1 to 30
/// 2. If D1 is 31, change D1 to 30
/// 3. If D2 is the last day of February and D1 was too, change D2 to 30
/// 4. If D2 is 31 and D1 is 30 or 31, change D2 to 30
///
/// # Formula
///
/// $$\text{Days} = 360 \times (Y_2 - Y_1) + 30 \times (M_2 - M_1) + (D_2 - D_1)$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360US;

impl DayCount for Thirty360US {
    fn name(&self) -> &'static str {
        "30/360 US"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        self.day_count(start, end) as f64 / 360.0
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let y1 = start.year() as i64;
        let y2 = end.year() as i64;
        let m1 = start.month() as i64;
        let m2 = end.month() as i64;
        let mut d1 = start.day() as i64;
        let mut d2 = end.day() as i64;

        let d1_was_feb_eom = is_last_day_of_february(start);

        if d1_was_feb_eom || d1 == 31 {
            d1 = 30;
        }

        if is_last_day_of_february(end) && d1_was_feb_eom {
            d2 = 30;
        } else if d2 == 31 && d1 >= 30 {
            d2 = 30;
        }

        360 * (y2 - y1) + 30 * (m2 - m1) + (d2 - d1)
    }
}

fn is_last_day_of_february(date: Date) -> bool {
    date.month() == 2 && date.is_end_of_month()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_full_year() {
        let dc = Thirty360US;
        assert_eq!(dc.day_count(date(2025, 1, 1), date(2026, 1, 1)), 360);
        assert_relative_eq!(dc.year_fraction(date(2025, 1, 1), date(2026, 1, 1)), 1.0);
    }

    #[test]
    fn test_month_end_31st() {
        let dc = Thirty360US;
        // D1 = 31 -> 30, D2 = 31 with D1 >= 30 -> 30
        assert_eq!(dc.day_count(date(2025, 1, 31), date(2025, 3, 31)), 60);
        // D2 = 31 but D1 < 30 keeps 31
        assert_eq!(dc.day_count(date(2025, 1, 15), date(2025, 3, 31)), 76);
    }

    #[test]
    fn test_february_end_of_month() {
        let dc = Thirty360US;
        assert_eq!(dc.day_count(date(2025, 2, 28), date(2025, 8, 31)), 180);
        assert_eq!(dc.day_count(date(2024, 2, 29), date(2025, 2, 28)), 360);
    }

    #[test]
    fn test_coupon_period_is_180_days() {
        let dc = Thirty360US;
        assert_eq!(dc.day_count(date(2025, 4, 30), date(2025, 10, 30)), 180);
        assert_eq!(dc.day_count(date(2024, 10, 30), date(2025, 4, 30)), 180);
    }

    #[test]
    fn test_negative_when_reversed() {
        let dc = Thirty360US;
        assert_eq!(dc.day_count(date(2025, 7, 15), date(2025, 1, 15)), -180);
        assert_eq!(dc.name(), "30/360 US");
    }
}
