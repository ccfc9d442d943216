//! Cash flow generation and accrued interest.
//!
//! Coupon dates are rolled backward from maturity in steps of
//! `12 / frequency` months, so the final period is always regular and any
//! short period falls at the front.

mod accrued;
mod schedule;

pub use accrued::AccruedInterestCalculator;
pub use schedule::{CashFlow, CouponSchedule};
