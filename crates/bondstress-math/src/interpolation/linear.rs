//! Linear interpolation with flat extrapolation.

use crate::error::{MathError, MathResult};
use crate::interpolation::Interpolator;

/// Linear interpolation between data points, flat outside the data range.
///
/// A single point yields a flat line at that value.
///
/// # Example
///
/// ```rust
/// use bondstress_math::interpolation::{Interpolator, LinearInterpolator};
///
/// let interp = LinearInterpolator::new(vec![1.0, 2.0, 5.0], vec![4.0, 4.5, 5.0]).unwrap();
/// assert!((interp.interpolate(1.5).unwrap() - 4.25).abs() < 1e-12);
/// assert!((interp.interpolate(0.25).unwrap() - 4.0).abs() < 1e-12);
/// assert!((interp.interpolate(30.0).unwrap() - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no points, if the lengths differ, or if
    /// `xs` is not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        if xs.is_empty() {
            return Err(MathError::EmptyTable);
        }
        if xs.len() != ys.len() {
            return Err(MathError::invalid_input(format!(
                "xs and ys must have same length: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return Err(MathError::invalid_input(
                "x values must be strictly increasing",
            ));
        }

        Ok(Self { xs, ys })
    }

    /// Returns the knot x values.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Returns the knot y values.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Finds the index i such that xs[i] <= x < xs[i+1].
    ///
    /// Only meaningful with at least two points and x inside the range.
    fn find_segment(&self, x: f64) -> usize {
        let upper = self.xs.partition_point(|&knot| knot <= x);
        upper.saturating_sub(1).min(self.xs.len() - 2)
    }
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        if x.is_nan() {
            return Err(MathError::invalid_input("cannot interpolate at NaN"));
        }

        let last = self.xs.len() - 1;
        if x <= self.xs[0] {
            return Ok(self.ys[0]);
        }
        if x >= self.xs[last] {
            return Ok(self.ys[last]);
        }

        let i = self.find_segment(x);
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);

        let t = (x - x0) / (x1 - x0);
        Ok(y0 + t * (y1 - y0))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        if x.is_nan() {
            return Err(MathError::invalid_input("cannot differentiate at NaN"));
        }
        if !self.in_range(x) || self.xs.len() == 1 {
            return Ok(0.0);
        }

        let i = self.find_segment(x);
        Ok((self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i]))
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}
