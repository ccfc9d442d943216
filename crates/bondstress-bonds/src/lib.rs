//! # Bondstress Bonds
//!
//! Analytics for fixed coupon bullet bonds on the 30/360 US basis.
//!
//! - **Cash flows**: Coupon dates rolled backward from maturity and
//!   [`AccruedInterestCalculator`]
//! - **Pricing**: [`YieldSolver`] (Newton-Raphson with bisection fallback)
//!   and [`PresentValueEngine`] (discounting off a tenor-keyed rate curve)
//! - **Amortization**: [`AmortizationSchedule`] pulling a book price
//!   linearly to par
//! - **Risk**: [`RiskCalculator`] bundling the above into stored metrics
//!
//! Rates, coupons and yields are in percent; prices are per 100 par.
//!
//! ## Example
//!
//! ```rust
//! use bondstress_bonds::prelude::*;
//! use bondstress_core::{Date, Frequency};
//!
//! let maturity = Date::from_ymd(2035, 4, 30).unwrap();
//! let as_of = Date::from_ymd(2025, 4, 30).unwrap();
//!
//! // A par bond on a coupon date yields its coupon
//! let ytm = YieldSolver::new().solve_ytm(100.0, 5.0, as_of, maturity, Frequency::SemiAnnual);
//! assert!((ytm.yield_value - 5.0).abs() < 1e-6);
//! assert!(!ytm.fallback);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::similar_names)]

pub mod amortization;
pub mod bond;
pub mod cashflows;
pub mod error;
pub mod pricing;
pub mod risk;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::amortization::AmortizationSchedule;
    pub use crate::bond::FixedCouponBond;
    pub use crate::cashflows::{AccruedInterestCalculator, CashFlow, CouponSchedule};
    pub use crate::error::{BondError, BondResult};
    pub use crate::pricing::{PresentValueEngine, YieldResult, YieldSolver};
    pub use crate::risk::RiskCalculator;
}

pub use amortization::AmortizationSchedule;
pub use bond::FixedCouponBond;
pub use cashflows::{AccruedInterestCalculator, CashFlow, CouponSchedule};
pub use error::{BondError, BondResult};
pub use pricing::{PresentValueEngine, YieldResult, YieldSolver};
pub use risk::RiskCalculator;
