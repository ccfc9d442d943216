//! # Bondstress Core
//!
//! Core types shared by every Bondstress crate.
//!
//! - **Types**: [`Date`] and coupon [`Frequency`]
//! - **Day Count Conventions**: 30/360 US bond basis used for accrual and
//!   cash-flow timing
//! - **Errors**: [`CoreError`] for invalid dates and frequencies
//!
//! ## Example
//!
//! ```rust
//! use bondstress_core::prelude::*;
//!
//! let position_date = Date::from_ymd(2025, 4, 30).unwrap();
//! let maturity = position_date.add_months(120).unwrap();
//! assert_eq!(position_date.months_between(&maturity), 120);
//!
//! let freq = Frequency::try_from(2).unwrap();
//! assert_eq!(freq.months_per_period(), 6);
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
#![allow(clippy::trivially_copy_pass_by_ref)]

pub mod daycounts;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::daycounts::{DayCount, Thirty360US};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Date, Frequency};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{Date, Frequency};
