//! Curve snapshot lookup over a curve point store.

use std::collections::BTreeMap;
use std::sync::Arc;

use bondstress_core::Date;
use bondstress_traits::{CurveName, CurvePointStore, RepositoryError};

use crate::curve::RateCurve;
use crate::error::{CurveError, CurveResult};

/// Loads rate curves by (curve name, as-of date).
///
/// Holds no state beyond the shared store; every call reads through.
pub struct CurveStore<S: ?Sized> {
    source: Arc<S>,
}

impl<S: ?Sized> Clone for CurveStore<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<S> CurveStore<S>
where
    S: CurvePointStore + ?Sized,
{
    /// Creates a curve store over a shared point store.
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Tenor → rate mapping for one snapshot, ascending in tenor.
    ///
    /// # Errors
    ///
    /// [`CurveError::MissingData`] when the snapshot has no points.
    pub async fn rates(
        &self,
        curve_name: &CurveName,
        as_of: Date,
    ) -> CurveResult<BTreeMap<u32, f64>> {
        Ok(self.curve(curve_name, as_of).await?.rates().clone())
    }

    /// Rate at a (possibly fractional) tenor in years: linear between
    /// bracketing tenors, flat outside.
    pub async fn rate_at(&self, curve_name: &CurveName, as_of: Date, tenor: f64) -> CurveResult<f64> {
        Ok(self.curve(curve_name, as_of).await?.rate_at(tenor))
    }

    /// Full curve for one snapshot.
    pub async fn curve(&self, curve_name: &CurveName, as_of: Date) -> CurveResult<RateCurve> {
        let points = match self.source.get_curve_points(curve_name, as_of).await {
            Ok(points) => points,
            Err(RepositoryError::MissingData { .. }) => {
                return Err(CurveError::missing_data(curve_name.as_str(), as_of))
            }
            Err(e) => return Err(e.into()),
        };
        if points.is_empty() {
            return Err(CurveError::missing_data(curve_name.as_str(), as_of));
        }

        log::debug!(
            "loaded curve {curve_name} on {as_of}: {} tenors",
            points.len()
        );
        RateCurve::from_points(&points)
    }
}
