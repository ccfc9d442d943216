//! Day count conventions for fixed income calculations.
//!
//! Bond accrual and cash-flow timing use the 30/360 US (Bond Basis)
//! convention throughout.
//!
//! ```rust
//! use bondstress_core::daycounts::{DayCount, Thirty360US};
//! use bondstress_core::types::Date;
//!
//! let dc = Thirty360US;
//! let start = Date::from_ymd(2025, 1, 15).unwrap();
//! let end = Date::from_ymd(2025, 7, 15).unwrap();
//!
//! assert_eq!(dc.day_count(start, end), 180);
//! assert!((dc.year_fraction(start, end) - 0.5).abs() < 1e-12);
//! ```

mod thirty360;

pub use thirty360::Thirty360US;

use crate::types::Date;

/// Trait for day count conventions.
///
/// Implementations must be thread-safe (`Send + Sync`) since valuation work
/// is fanned out across worker threads.
pub trait DayCount: Send + Sync {
    /// Returns the name of the day count convention (e.g. "30/360 US").
    fn name(&self) -> &'static str;

    /// Calculates the year fraction between two dates.
    ///
    /// Negative if `end < start`.
    fn year_fraction(&self, start: Date, end: Date) -> f64;

    /// Calculates the day count between two dates under the convention.
    fn day_count(&self, start: Date, end: Date) -> i64;
}
