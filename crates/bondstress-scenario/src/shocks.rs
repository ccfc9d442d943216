//! Multi-period shock accumulation.
//!
//! Scenarios store the incremental shock of each period. The engine turns
//! them into the running total per tenor that is added to the base curve:
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use bondstress_scenario::ShockAccumulator;
//!
//! let periods: Vec<BTreeMap<u32, f64>> = [-0.25, -0.25, -0.05]
//!     .iter()
//!     .map(|&s| [(1, s), (10, s)].into_iter().collect())
//!     .collect();
//!
//! let cumulative = ShockAccumulator::accumulate(&periods);
//! assert!((cumulative[2][&10] + 0.55).abs() < 1e-12);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ScenarioError, ScenarioResult};

/// Shock size (percent) per tenor.
pub type ShockMap = BTreeMap<u32, f64>;

/// Running per-tenor shock total along one simulation path.
///
/// Tenors absent from a later period keep their accumulated value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShockAccumulator {
    cumulative: ShockMap,
}

impl ShockAccumulator {
    /// Starts a path with no shock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one period's incremental shocks and returns the new totals.
    pub fn push(&mut self, period: &ShockMap) -> &ShockMap {
        for (&tenor, &shock) in period {
            *self.cumulative.entry(tenor).or_insert(0.0) += shock;
        }
        &self.cumulative
    }

    /// Totals so far.
    pub fn cumulative(&self) -> &ShockMap {
        &self.cumulative
    }

    /// Cumulative shocks for each period of a path in ascending period order.
    pub fn accumulate(periods: &[ShockMap]) -> Vec<ShockMap> {
        let mut acc = Self::new();
        periods.iter().map(|p| acc.push(p).clone()).collect()
    }

    /// Converts running totals back to per-period increments.
    ///
    /// Used at ingestion for input labelled cumulative. A tenor missing
    /// from a period is treated as unchanged since the previous period.
    pub fn decumulate(periods: &[ShockMap]) -> Vec<ShockMap> {
        let mut previous = ShockMap::new();
        periods
            .iter()
            .map(|period| {
                let increments = period
                    .iter()
                    .map(|(&tenor, &total)| {
                        (tenor, total - previous.get(&tenor).copied().unwrap_or(0.0))
                    })
                    .collect();
                previous.extend(period.iter().map(|(&t, &s)| (t, s)));
                increments
            })
            .collect()
    }

    /// Checks that every period shocks the same tenors as the first.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::Validation`] naming the first period whose tenor set
    /// differs.
    pub fn validate_tenor_sets(periods: &[ShockMap]) -> ScenarioResult<()> {
        let Some(first) = periods.first() else {
            return Ok(());
        };
        let expected: BTreeSet<u32> = first.keys().copied().collect();

        for (index, period) in periods.iter().enumerate().skip(1) {
            let tenors: BTreeSet<u32> = period.keys().copied().collect();
            if tenors != expected {
                return Err(ScenarioError::validation(
                    format!("period {index}"),
                    format!("shocked tenors {tenors:?} differ from {expected:?}"),
                ));
            }
        }
        Ok(())
    }
}
