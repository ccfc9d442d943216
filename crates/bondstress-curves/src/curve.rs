//! In-memory rate curve.

use std::collections::BTreeMap;

use bondstress_math::interpolation::{Interpolator, LinearInterpolator};
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};
use bondstress_traits::CurvePoint;

/// Rate curve keyed by whole-year tenor, rates in percent.
///
/// `rate_at(t)` interpolates linearly between bracketing tenors and holds
/// the first/last rate flat outside the tenor range. A single-tenor curve is
/// flat everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<u32, f64>", into = "BTreeMap<u32, f64>")]
pub struct RateCurve {
    rates: BTreeMap<u32, f64>,
    interpolator: LinearInterpolator,
}

impl RateCurve {
    /// Builds a curve from (tenor, rate) pairs in any order.
    ///
    /// # Errors
    ///
    /// Fails on an empty input, a repeated tenor, or a non-finite rate.
    pub fn new(points: impl IntoIterator<Item = (u32, f64)>) -> CurveResult<Self> {
        let mut rates = BTreeMap::new();
        for (tenor, rate) in points {
            if !rate.is_finite() {
                return Err(CurveError::InvalidRate { tenor, rate });
            }
            if rates.insert(tenor, rate).is_some() {
                return Err(CurveError::DuplicateTenor { tenor });
            }
        }
        Self::from_map(rates)
    }

    /// Builds a curve from stored points of one snapshot.
    pub fn from_points(points: &[CurvePoint]) -> CurveResult<Self> {
        Self::new(points.iter().map(|p| (p.tenor, p.rate)))
    }

    fn from_map(rates: BTreeMap<u32, f64>) -> CurveResult<Self> {
        let xs = rates.keys().map(|&t| t as f64).collect();
        let ys = rates.values().copied().collect();
        let interpolator = LinearInterpolator::new(xs, ys)?;
        Ok(Self {
            rates,
            interpolator,
        })
    }

    /// Rate in percent at a time in years.
    ///
    /// Non-finite `t` falls back to the shortest tenor's rate.
    pub fn rate_at(&self, t: f64) -> f64 {
        self.interpolator
            .interpolate(t)
            .unwrap_or_else(|_| self.interpolator.ys()[0])
    }

    /// Tenor → rate mapping, strictly increasing in tenor.
    pub fn rates(&self) -> &BTreeMap<u32, f64> {
        &self.rates
    }

    /// Tenors on the curve, ascending.
    pub fn tenors(&self) -> Vec<u32> {
        self.rates.keys().copied().collect()
    }

    /// Returns a new curve with per-tenor shifts (percent) added.
    ///
    /// Tenors without a shift keep their rate.
    ///
    /// # Errors
    ///
    /// Fails with [`CurveError::UnknownTenor`] if a shift names a tenor that
    /// is not on the curve.
    pub fn shifted(&self, shifts: &BTreeMap<u32, f64>) -> CurveResult<Self> {
        let mut rates = self.rates.clone();
        for (&tenor, &shift) in shifts {
            let rate = rates.get_mut(&tenor).ok_or_else(|| CurveError::UnknownTenor {
                tenor,
                available: self.tenors(),
            })?;
            *rate += shift;
            if !rate.is_finite() {
                return Err(CurveError::InvalidRate { tenor, rate: *rate });
            }
        }
        Self::from_map(rates)
    }

    /// Returns a new curve with the same shift added at every tenor.
    pub fn parallel_shift(&self, shift: f64) -> CurveResult<Self> {
        let shifts = self.rates.keys().map(|&t| (t, shift)).collect();
        self.shifted(&shifts)
    }
}

impl TryFrom<BTreeMap<u32, f64>> for RateCurve {
    type Error = CurveError;

    fn try_from(rates: BTreeMap<u32, f64>) -> Result<Self, Self::Error> {
        Self::new(rates)
    }
}

impl From<RateCurve> for BTreeMap<u32, f64> {
    fn from(curve: RateCurve) -> Self {
        curve.rates
    }
}
