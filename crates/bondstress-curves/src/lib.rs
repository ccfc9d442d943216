//! # Bondstress Curves
//!
//! Rate curves keyed by whole-year tenor.
//!
//! - [`RateCurve`]: In-memory curve, linear between tenors and flat beyond
//!   the first and last tenor. Supports per-tenor shifts for stressed curves.
//! - [`CurveStore`]: Loads curve snapshots by (name, as-of date) from any
//!   [`CurvePointStore`](bondstress_traits::CurvePointStore).
//!
//! All rates are in percent.
//!
//! ## Example
//!
//! ```rust
//! use bondstress_curves::RateCurve;
//!
//! let curve = RateCurve::new([(1, 4.0), (2, 4.5), (5, 5.0)]).unwrap();
//! assert!((curve.rate_at(1.5) - 4.25).abs() < 1e-12);
//! assert!((curve.rate_at(30.0) - 5.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]

mod curve;
pub mod error;
mod store;

pub use bondstress_traits::CurvePoint;
pub use curve::RateCurve;
pub use error::{CurveError, CurveResult};
pub use store::CurveStore;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::curve::RateCurve;
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::store::CurveStore;
    pub use bondstress_traits::CurvePoint;
}
