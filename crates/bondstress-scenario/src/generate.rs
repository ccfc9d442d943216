//! Parallel shift scenario families.
//!
//! A parallel family has one simulation path. Each period shocks every
//! tenor of the base snapshot by the same amount, so a family built from
//! `{0: -0.25, 1: -0.25, 2: -0.05}` lowers the curve by 25bp, then 25bp
//! more, then 5bp more.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use bondstress_core::Date;
use bondstress_curves::RateCurve;
use bondstress_traits::{
    CurveName, CurvePointShock, Repository, ScenarioName, ScenarioRow, StressScenario,
    StressScenarioDescription,
};

use crate::error::{ScenarioError, ScenarioResult};
use crate::orchestrator::ScenarioOrchestrator;

fn default_period_length() -> f64 {
    1.0
}

/// A parallel shift family to build on one curve snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelShift {
    /// Name of the new family.
    pub scenario_name: ScenarioName,
    /// Free text stored with the family.
    #[serde(default)]
    pub description: Option<String>,
    /// Base curve.
    pub curve_name: CurveName,
    /// Base snapshot date.
    pub as_of: Date,
    /// Shock in percent per period number, applied at every tenor.
    pub shocks_by_period: BTreeMap<u32, f64>,
    /// Period length in years.
    #[serde(default = "default_period_length")]
    pub period_length: f64,
}

/// Builds the rows of a parallel family: one row per period on simulation
/// path 0, with a shock at every tenor of `curve`.
///
/// # Errors
///
/// Validation error when there are no periods, when a shock is not finite
/// or when the period length is not positive.
pub fn parallel_scenario(curve: &RateCurve, shift: &ParallelShift) -> ScenarioResult<Vec<ScenarioRow>> {
    let name = &shift.scenario_name;
    if shift.shocks_by_period.is_empty() {
        return Err(ScenarioError::validation(name, "no periods to shock"));
    }
    if !shift.period_length.is_finite() || shift.period_length <= 0.0 {
        return Err(ScenarioError::validation(
            name,
            format!("period length {} is not positive", shift.period_length),
        ));
    }
    if let Some((period, shock)) = shift
        .shocks_by_period
        .iter()
        .find(|(_, shock)| !shock.is_finite())
    {
        return Err(ScenarioError::validation(
            name,
            format!("shock {shock} for period {period} is not finite"),
        ));
    }

    let tenors = curve.tenors();

    Ok(shift
        .shocks_by_period
        .iter()
        .map(|(&period_number, &shock_size)| ScenarioRow {
            scenario: StressScenario {
                scenario_name: name.clone(),
                period_number,
                simulation_number: 0,
                period_length: shift.period_length,
            },
            shocks: tenors
                .iter()
                .map(|&tenor| CurvePointShock {
                    curve_name: shift.curve_name.clone(),
                    as_of: shift.as_of,
                    tenor,
                    shock_size,
                })
                .collect(),
        })
        .collect())
}

impl<R> ScenarioOrchestrator<R>
where
    R: Repository + ?Sized,
{
    /// Builds a parallel family on a stored curve snapshot and stores it.
    ///
    /// Fails with missing data when the snapshot does not exist and with a
    /// conflict when the family name is taken.
    pub async fn create_parallel_scenario(
        &self,
        shift: &ParallelShift,
    ) -> ScenarioResult<Vec<ScenarioRow>> {
        let curve = self.curves.curve(&shift.curve_name, shift.as_of).await?;
        let rows = parallel_scenario(&curve, shift)?;

        let description = StressScenarioDescription {
            name: shift.scenario_name.clone(),
            description: shift.description.clone(),
        };
        self.repository
            .insert_scenario(description, rows.clone())
            .await?;

        info!(
            scenario = %shift.scenario_name,
            curve = %shift.curve_name,
            as_of = %shift.as_of,
            periods = rows.len(),
            "parallel scenario stored"
        );
        Ok(rows)
    }
}
