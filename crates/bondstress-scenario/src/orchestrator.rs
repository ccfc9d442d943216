//! Scenario run orchestration.
//!
//! A run projects every lot of a portfolio snapshot through every period of
//! a stress scenario family:
//!
//! ```text
//! positions ─> securities ─> amortization schedules ─┐
//!                                                    ├─> work items (rayon) ─> ScenarioPosition
//! scenario rows ─> cumulative shocks ─> shocked curve┘                        RiskScenario
//! ```
//!
//! Storage is read up front; the numerical work runs on the blocking pool so
//! the async runtime is never stalled by rayon.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use bondstress_bonds::{AmortizationSchedule, BondError, FixedCouponBond, RiskCalculator, YieldSolver};
use bondstress_core::Date;
use bondstress_curves::{CurveError, CurveStore, RateCurve};
use bondstress_traits::{
    CurveName, PortfolioName, Position, Repository, RiskScenario, RiskScenarioKey, ScenarioPosition,
    ScenarioRow, ScenarioRunKey, Security, SecurityId, StressScenario,
};

use crate::config::ScenarioConfig;
use crate::error::{ScenarioError, ScenarioResult};
use crate::shocks::{ShockAccumulator, ShockMap};
use crate::trend::{portfolio_trend, TrendPoint};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// A scenario row that produced no positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFailure {
    /// Scenario period.
    pub period_number: u32,
    /// Simulation path.
    pub simulation_number: u32,
    /// Rendered error.
    pub error: String,
}

/// Summary of one scenario run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Run key.
    pub key: ScenarioRunKey,
    /// Scenario rows in the family.
    pub rows_total: usize,
    /// Rows that were valued (successfully or not) before any deadline.
    pub rows_processed: usize,
    /// Scenario positions generated.
    pub positions_generated: usize,
    /// Lot/period pairs skipped because the security matured first.
    pub excluded_matured: usize,
    /// Yields reported as the sentinel fallback.
    pub convergence_failures: usize,
    /// Rows aborted by missing data or validation errors.
    pub failed_rows: Vec<RowFailure>,
    /// False when a deadline cut the run short.
    pub complete: bool,
    /// True once the result set replaced the stored one.
    pub persisted: bool,
    /// Wall time of the run.
    pub elapsed_ms: u64,
}

/// Result of a scenario run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioRun {
    /// Run summary.
    pub report: RunReport,
    /// Generated positions ordered by (period, simulation, lot).
    pub positions: Vec<ScenarioPosition>,
    /// Matching risk records, same order.
    pub risk_scenarios: Vec<RiskScenario>,
}

/// Drives scenario runs and baseline valuation against a repository.
pub struct ScenarioOrchestrator<R: ?Sized> {
    pub(crate) repository: Arc<R>,
    pub(crate) curves: CurveStore<R>,
    pub(crate) config: ScenarioConfig,
}

impl<R> ScenarioOrchestrator<R>
where
    R: Repository + ?Sized,
{
    /// Creates an orchestrator with default settings.
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            curves: CurveStore::new(Arc::clone(&repository)),
            repository,
            config: ScenarioConfig::default(),
        }
    }

    /// Replaces the settings.
    #[must_use]
    pub fn with_config(mut self, config: ScenarioConfig) -> Self {
        self.config = config;
        self
    }

    /// Current settings.
    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Underlying repository.
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Runs a scenario family with the configured default deadline.
    pub async fn generate_scenario_positions(
        &self,
        key: &ScenarioRunKey,
    ) -> ScenarioResult<ScenarioRun> {
        self.generate_with_deadline(key, self.config.deadline()).await
    }

    /// Runs a scenario family and persists the result set when complete.
    ///
    /// Once `deadline` has elapsed no further rows or work items start; the
    /// partial result is returned with `complete = false` and not stored.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::MissingData`] when the portfolio snapshot, one of its
    /// securities or the scenario family does not exist. Failures confined
    /// to a row are reported in [`RunReport::failed_rows`] instead.
    pub async fn generate_with_deadline(
        &self,
        key: &ScenarioRunKey,
        deadline: Option<Duration>,
    ) -> ScenarioResult<ScenarioRun> {
        let started = Instant::now();
        let deadline = deadline.map(|d| started + d);

        let positions = self
            .load_positions(&key.portfolio, key.position_date)
            .await?;
        let securities = self.load_securities(&positions).await?;
        let rows = self.repository.get_scenario_rows(&key.scenario_name).await?;
        if rows.is_empty() {
            return Err(ScenarioError::missing("stress scenario", &key.scenario_name));
        }

        info!(
            portfolio = %key.portfolio,
            position_date = %key.position_date,
            scenario = %key.scenario_name,
            positions = positions.len(),
            rows = rows.len(),
            "starting scenario run"
        );

        let lots = self.build_lots(
            key.position_date,
            positions,
            &securities,
            &period_lengths(&rows),
        )?;
        let planned = plan_rows(&rows);
        let prepared = self.prepare_rows(key.position_date, planned).await;

        let rows_total = rows.len();
        let solver = self.config.yield_solver();
        let parallel = self.config.parallel;
        let run_key = key.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            value_rows(&run_key, prepared, &lots, &solver, parallel, deadline)
        })
        .await
        .map_err(|e| ScenarioError::Internal(e.to_string()))?;

        let persisted = if outcome.complete {
            self.repository
                .persist_scenario_positions(key, outcome.positions.clone())
                .await?;
            self.repository
                .persist_risk_scenarios(key, outcome.risk_scenarios.clone())
                .await?;
            true
        } else {
            warn!(
                portfolio = %key.portfolio,
                scenario = %key.scenario_name,
                rows_processed = outcome.rows_processed,
                rows_total,
                "deadline expired, partial result not persisted"
            );
            false
        };

        let report = RunReport {
            key: key.clone(),
            rows_total,
            rows_processed: outcome.rows_processed,
            positions_generated: outcome.positions.len(),
            excluded_matured: outcome.excluded_matured,
            convergence_failures: outcome.convergence_failures,
            failed_rows: outcome.failures,
            complete: outcome.complete,
            persisted,
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        info!(
            portfolio = %key.portfolio,
            scenario = %key.scenario_name,
            positions = report.positions_generated,
            excluded_matured = report.excluded_matured,
            convergence_failures = report.convergence_failures,
            failed_rows = report.failed_rows.len(),
            elapsed_ms = report.elapsed_ms,
            "scenario run finished"
        );

        Ok(ScenarioRun {
            report,
            positions: outcome.positions,
            risk_scenarios: outcome.risk_scenarios,
        })
    }

    /// Stored scenario positions of a run.
    pub async fn scenario_positions(
        &self,
        key: &ScenarioRunKey,
    ) -> ScenarioResult<Vec<ScenarioPosition>> {
        Ok(self.repository.get_scenario_positions(key).await?)
    }

    /// Portfolio market value per period of a stored run.
    pub async fn portfolio_stress_trend(
        &self,
        key: &ScenarioRunKey,
    ) -> ScenarioResult<Vec<TrendPoint>> {
        let rows = self.scenario_positions(key).await?;
        Ok(portfolio_trend(&rows))
    }

    pub(crate) async fn load_positions(
        &self,
        portfolio: &PortfolioName,
        position_date: Date,
    ) -> ScenarioResult<Vec<Position>> {
        let positions = self.repository.get_positions(portfolio, position_date).await?;
        if positions.is_empty() {
            return Err(ScenarioError::missing(
                "positions",
                format!("{portfolio}@{position_date}"),
            ));
        }
        Ok(positions)
    }

    pub(crate) async fn load_securities(
        &self,
        positions: &[Position],
    ) -> ScenarioResult<HashMap<SecurityId, Security>> {
        let mut securities = HashMap::new();
        for position in positions {
            if !securities.contains_key(&position.security_id) {
                let security = self.repository.get_security(&position.security_id).await?;
                securities.insert(position.security_id.clone(), security);
            }
        }
        Ok(securities)
    }

    /// Builds one amortization schedule per (security, book price, period
    /// length) so each scenario period steps by its own length.
    fn build_lots(
        &self,
        position_date: Date,
        positions: Vec<Position>,
        securities: &HashMap<SecurityId, Security>,
        period_lengths: &[f64],
    ) -> ScenarioResult<Vec<Lot>> {
        let mut cache: HashMap<(SecurityId, Decimal, u64), AmortizationSchedule> = HashMap::new();
        let mut lots = Vec::with_capacity(positions.len());

        for position in positions {
            let security = securities
                .get(&position.security_id)
                .ok_or_else(|| ScenarioError::missing("security", &position.security_id))?;
            let bond = FixedCouponBond::from(security);

            let mut schedules = HashMap::with_capacity(period_lengths.len());
            for &length in period_lengths {
                let cache_key = (position.security_id.clone(), position.book_price, length.to_bits());
                let schedule = match cache.get(&cache_key) {
                    Some(schedule) => *schedule,
                    None => {
                        let schedule = AmortizationSchedule::compute(
                            position.book_price,
                            bond.maturity,
                            position_date,
                            length,
                        )?;
                        cache.insert(cache_key, schedule);
                        schedule
                    }
                };
                schedules.insert(length.to_bits(), schedule);
            }

            lots.push(Lot {
                position,
                bond,
                schedules,
            });
        }

        debug!(
            lots = lots.len(),
            schedules = cache.len(),
            "amortization schedules built"
        );
        Ok(lots)
    }

    /// Loads each referenced base curve once and shocks it per row.
    async fn prepare_rows(&self, position_date: Date, planned: Vec<PlannedRow>) -> Vec<PreparedRow> {
        let mut bases: HashMap<(CurveName, Date), ScenarioResult<RateCurve>> = HashMap::new();
        for row in &planned {
            if let Ok(base) = &row.base {
                if !bases.contains_key(base) {
                    let curve = self
                        .curves
                        .curve(&base.0, base.1)
                        .await
                        .map_err(ScenarioError::from);
                    bases.insert(base.clone(), curve);
                }
            }
        }

        planned
            .into_iter()
            .map(|row| {
                let key = row_key(&row.scenario);
                let shocked = row.base.and_then(|base| {
                    let curve = bases
                        .get(&base)
                        .cloned()
                        .unwrap_or_else(|| {
                            Err(ScenarioError::missing(
                                "curve points",
                                format!("{}@{}", base.0, base.1),
                            ))
                        })?;
                    let curve = shocked_curve(&curve, &row.cumulative)
                        .map_err(|e| match e {
                            e @ CurveError::UnknownTenor { .. } => {
                                ScenarioError::validation(&key, e.to_string())
                            }
                            other => other.into(),
                        })?;
                    let period_end = period_end_date(position_date, &row.scenario)?;
                    Ok(ShockedRow { curve, period_end })
                });
                PreparedRow {
                    scenario: row.scenario,
                    shocked,
                }
            })
            .collect()
    }
}

/// Base curve plus cumulative per-tenor shocks.
///
/// # Errors
///
/// [`CurveError::UnknownTenor`] when a shock names a tenor the base curve
/// does not have.
pub fn shocked_curve(base: &RateCurve, cumulative: &ShockMap) -> Result<RateCurve, CurveError> {
    base.shifted(cumulative)
}

/// End of a scenario period: `(period_number + 1) × period_length` years
/// after the position date, in whole months.
pub fn period_end_date(position_date: Date, scenario: &StressScenario) -> ScenarioResult<Date> {
    if !scenario.period_length.is_finite() || scenario.period_length <= 0.0 {
        return Err(ScenarioError::validation(
            row_key(scenario),
            format!("period length {} is not positive", scenario.period_length),
        ));
    }
    let years = f64::from(scenario.period_number + 1) * scenario.period_length;
    Ok(position_date.add_fractional_years(years)?)
}

/// Distinct valid period lengths of a scenario family.
fn period_lengths(rows: &[ScenarioRow]) -> Vec<f64> {
    rows.iter()
        .map(|row| row.scenario.period_length)
        .filter(|length| length.is_finite() && *length > 0.0)
        .map(f64::to_bits)
        .collect::<BTreeSet<u64>>()
        .into_iter()
        .map(f64::from_bits)
        .collect()
}

fn row_key(scenario: &StressScenario) -> String {
    format!(
        "{} period {} simulation {}",
        scenario.scenario_name, scenario.period_number, scenario.simulation_number
    )
}

pub(crate) fn to_decimal(value: f64, what: &str) -> ScenarioResult<Decimal> {
    Decimal::from_f64(value)
        .ok_or_else(|| BondError::invalid_price(format!("{what} {value} is not representable")).into())
}

// =============================================================================
// ROW PLANNING
// =============================================================================

/// A scenario row with its path's cumulative shocks.
#[derive(Debug, Clone)]
struct PlannedRow {
    scenario: StressScenario,
    base: ScenarioResult<(CurveName, Date)>,
    cumulative: ShockMap,
}

/// Curve snapshot and per-tenor increments of one row.
fn row_shocks(row: &ScenarioRow) -> ScenarioResult<Option<((CurveName, Date), ShockMap)>> {
    let key = row_key(&row.scenario);
    let mut base: Option<(CurveName, Date)> = None;
    let mut increments = ShockMap::new();

    for shock in &row.shocks {
        let point = (shock.curve_name.clone(), shock.as_of);
        if let Some((name, as_of)) = base.as_ref().filter(|b| **b != point) {
            return Err(ScenarioError::validation(
                &key,
                format!(
                    "shocks reference both {name}@{as_of} and {}@{}",
                    point.0, point.1
                ),
            ));
        }
        base.get_or_insert(point);
        if !shock.shock_size.is_finite() {
            return Err(ScenarioError::validation(
                &key,
                format!("shock at tenor {} is not finite", shock.tenor),
            ));
        }
        if increments.insert(shock.tenor, shock.shock_size).is_some() {
            return Err(ScenarioError::validation(
                &key,
                format!("tenor {} shocked twice", shock.tenor),
            ));
        }
    }

    Ok(base.map(|b| (b, increments)))
}

/// Accumulates shocks along each simulation path in period order.
///
/// A row without shocks reuses the path's curve snapshot and totals. Once a
/// row fails validation every later period on its path fails too, since
/// their cumulative shocks would be missing its increments.
fn plan_rows(rows: &[ScenarioRow]) -> Vec<PlannedRow> {
    let mut paths: BTreeMap<u32, Vec<&ScenarioRow>> = BTreeMap::new();
    for row in rows {
        paths
            .entry(row.scenario.simulation_number)
            .or_default()
            .push(row);
    }

    let mut planned = Vec::with_capacity(rows.len());
    for (simulation, mut path) in paths {
        path.sort_by_key(|row| row.scenario.period_number);

        let mut accumulator = ShockAccumulator::new();
        let mut path_base: Option<(CurveName, Date)> = None;
        let mut tenor_sets = Vec::with_capacity(path.len());
        let mut failed_at: Option<u32> = None;

        for row in path {
            let key = row_key(&row.scenario);
            if let Some(period) = failed_at {
                planned.push(PlannedRow {
                    scenario: row.scenario.clone(),
                    base: Err(ScenarioError::validation(
                        &key,
                        format!("earlier period {period} on this path failed"),
                    )),
                    cumulative: accumulator.cumulative().clone(),
                });
                continue;
            }

            let base = match row_shocks(row) {
                Ok(Some((base, increments))) => {
                    let switched = path_base.as_ref().filter(|p| **p != base).map(|p| {
                        format!("path moves from {}@{} to {}@{}", p.0, p.1, base.0, base.1)
                    });
                    match switched {
                        Some(message) => Err(ScenarioError::validation(&key, message)),
                        None => {
                            accumulator.push(&increments);
                            tenor_sets.push(increments);
                            path_base = Some(base.clone());
                            Ok(base)
                        }
                    }
                }
                Ok(None) => path_base
                    .clone()
                    .ok_or_else(|| ScenarioError::validation(&key, "no curve point shocks")),
                Err(e) => Err(e),
            };
            if base.is_err() {
                failed_at = Some(row.scenario.period_number);
            }

            planned.push(PlannedRow {
                scenario: row.scenario.clone(),
                base,
                cumulative: accumulator.cumulative().clone(),
            });
        }

        if let Err(e) = ShockAccumulator::validate_tenor_sets(&tenor_sets) {
            warn!(simulation, error = %e, "shocked tenors vary along path, carrying forward");
        }
    }

    planned.sort_by_key(|row| (row.scenario.period_number, row.scenario.simulation_number));
    planned
}

// =============================================================================
// WORK ITEMS
// =============================================================================

struct Lot {
    position: Position,
    bond: FixedCouponBond,
    /// Keyed by the bit pattern of the period length.
    schedules: HashMap<u64, AmortizationSchedule>,
}

struct ShockedRow {
    curve: RateCurve,
    period_end: Date,
}

struct PreparedRow {
    scenario: StressScenario,
    shocked: ScenarioResult<ShockedRow>,
}

enum LotOutcome {
    Valued(Box<(ScenarioPosition, RiskScenario)>),
    Matured,
    TimedOut,
}

#[derive(Default)]
struct RowsOutcome {
    positions: Vec<ScenarioPosition>,
    risk_scenarios: Vec<RiskScenario>,
    failures: Vec<RowFailure>,
    rows_processed: usize,
    excluded_matured: usize,
    convergence_failures: usize,
    complete: bool,
}

fn expired(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}

fn value_rows(
    key: &ScenarioRunKey,
    rows: Vec<PreparedRow>,
    lots: &[Lot],
    solver: &YieldSolver,
    parallel: bool,
    deadline: Option<Instant>,
) -> RowsOutcome {
    let mut outcome = RowsOutcome {
        complete: true,
        ..RowsOutcome::default()
    };

    for row in rows {
        if expired(deadline) {
            outcome.complete = false;
            break;
        }
        outcome.rows_processed += 1;

        let scenario = row.scenario;
        let shocked = match row.shocked {
            Ok(shocked) => shocked,
            Err(e) => {
                warn!(
                    period = scenario.period_number,
                    simulation = scenario.simulation_number,
                    error = %e,
                    "scenario row skipped"
                );
                outcome.failures.push(RowFailure {
                    period_number: scenario.period_number,
                    simulation_number: scenario.simulation_number,
                    error: e.to_string(),
                });
                continue;
            }
        };

        let value = |lot: &Lot| value_lot(key, lot, &scenario, &shocked, solver, deadline);
        let items: ScenarioResult<Vec<LotOutcome>> = if parallel {
            lots.par_iter().map(value).collect()
        } else {
            lots.iter().map(value).collect()
        };

        let items = match items {
            Ok(items) => items,
            Err(e) => {
                warn!(
                    period = scenario.period_number,
                    simulation = scenario.simulation_number,
                    error = %e,
                    "scenario row aborted"
                );
                outcome.failures.push(RowFailure {
                    period_number: scenario.period_number,
                    simulation_number: scenario.simulation_number,
                    error: e.to_string(),
                });
                continue;
            }
        };

        let mut valued = 0usize;
        for item in items {
            match item {
                LotOutcome::Valued(pair) => {
                    let (position, risk) = *pair;
                    if risk.metrics.ytm_fallback {
                        outcome.convergence_failures += 1;
                    }
                    outcome.positions.push(position);
                    outcome.risk_scenarios.push(risk);
                    valued += 1;
                }
                LotOutcome::Matured => outcome.excluded_matured += 1,
                LotOutcome::TimedOut => outcome.complete = false,
            }
        }

        debug!(
            period = scenario.period_number,
            simulation = scenario.simulation_number,
            period_end = %shocked.period_end,
            positions = valued,
            "scenario row valued"
        );
    }

    outcome
}

fn value_lot(
    key: &ScenarioRunKey,
    lot: &Lot,
    scenario: &StressScenario,
    shocked: &ShockedRow,
    solver: &YieldSolver,
    deadline: Option<Instant>,
) -> ScenarioResult<LotOutcome> {
    if expired(deadline) {
        return Ok(LotOutcome::TimedOut);
    }
    if lot.bond.maturity < shocked.period_end {
        return Ok(LotOutcome::Matured);
    }

    let position = &lot.position;
    let schedule = lot
        .schedules
        .get(&scenario.period_length.to_bits())
        .ok_or_else(|| {
            ScenarioError::validation(
                row_key(scenario),
                format!("no schedule for period length {}", scenario.period_length),
            )
        })?;
    let book_price = schedule.projected_book_price(scenario.period_number);
    let clean_price = book_price
        .to_f64()
        .ok_or_else(|| BondError::invalid_price(format!("projected price {book_price}")))?;

    let metrics = RiskCalculator::calculate(
        &lot.bond,
        clean_price,
        shocked.period_end,
        &shocked.curve,
        solver,
    )?;
    let pv = to_decimal(metrics.discounted_pv, "present value")?;

    let notional_amount = position.quantity * book_price / HUNDRED;
    let risk_key = RiskScenarioKey {
        lot_id: position.lot_id,
        period_number: scenario.period_number,
        simulation_number: scenario.simulation_number,
    };

    let scenario_position = ScenarioPosition {
        portfolio: key.portfolio.clone(),
        position_date: key.position_date,
        scenario: scenario.clone(),
        period_end_date: shocked.period_end,
        lot_id: position.lot_id,
        security_id: position.security_id.clone(),
        quantity: position.quantity,
        book_price,
        notional_amount,
        par_value: position.quantity,
        book_value: notional_amount,
        discounted_value: position.quantity * pv / HUNDRED,
        risk_scenario: risk_key,
    };
    let risk = RiskScenario {
        key: risk_key,
        security_id: position.security_id.clone(),
        metrics,
    };

    Ok(LotOutcome::Valued(Box::new((scenario_position, risk))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bondstress_traits::CurvePointShock;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn scenario(period: u32, simulation: u32) -> StressScenario {
        StressScenario {
            scenario_name: "USD_SWAP_SHIFT_04".into(),
            period_number: period,
            simulation_number: simulation,
            period_length: 1.0,
        }
    }

    fn parallel_row(period: u32, simulation: u32, size: f64) -> ScenarioRow {
        ScenarioRow {
            scenario: scenario(period, simulation),
            shocks: [1, 10, 30]
                .into_iter()
                .map(|tenor| CurvePointShock {
                    curve_name: "USD_SWAP".into(),
                    as_of: date(2025, 4, 30),
                    tenor,
                    shock_size: size,
                })
                .collect(),
        }
    }

    #[test]
    fn test_plan_accumulates_per_path() {
        let rows = vec![
            parallel_row(1, 0, -0.25),
            parallel_row(0, 0, -0.25),
            parallel_row(0, 1, 0.5),
            parallel_row(2, 0, -0.05),
        ];

        let planned = plan_rows(&rows);
        let order: Vec<_> = planned
            .iter()
            .map(|r| (r.scenario.period_number, r.scenario.simulation_number))
            .collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (2, 0)]);

        assert_relative_eq!(planned[0].cumulative[&10], -0.25);
        assert_relative_eq!(planned[1].cumulative[&10], 0.5);
        assert_relative_eq!(planned[2].cumulative[&10], -0.5);
        assert_relative_eq!(planned[3].cumulative[&10], -0.55, epsilon = 1e-12);
        assert!(planned.iter().all(|r| r.base.is_ok()));
    }

    #[test]
    fn test_row_without_shocks_carries_path_forward() {
        let mut empty = parallel_row(1, 0, 0.0);
        empty.shocks.clear();
        let rows = vec![parallel_row(0, 0, 0.1), empty];

        let planned = plan_rows(&rows);
        assert_relative_eq!(planned[1].cumulative[&1], 0.1);
        assert_eq!(
            planned[1].base.as_ref().unwrap(),
            &(CurveName::new("USD_SWAP"), date(2025, 4, 30))
        );

        let mut orphan = parallel_row(0, 3, 0.0);
        orphan.shocks.clear();
        let planned = plan_rows(&[orphan]);
        assert!(planned[0].base.as_ref().unwrap_err().is_validation());
    }

    #[test]
    fn test_row_mixing_curves_is_invalid() {
        let mut row = parallel_row(0, 0, 0.1);
        row.shocks[1].curve_name = "EUR_SWAP".into();

        let planned = plan_rows(&[row, parallel_row(1, 0, 0.1), parallel_row(0, 1, 0.2)]);
        let err = planned[0].base.as_ref().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("period 0 simulation 0"));

        // later periods of the broken path fail, other paths are untouched
        assert_eq!(planned[2].scenario.period_number, 1);
        let err = planned[2].base.as_ref().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("earlier period 0"));
        assert!(planned[1].base.is_ok());
        assert_relative_eq!(planned[1].cumulative[&1], 0.2);
    }

    #[test]
    fn test_failed_period_poisons_rest_of_path() {
        let mut broken = parallel_row(1, 0, 0.1);
        broken.shocks[2].shock_size = f64::NAN;
        let rows = vec![
            parallel_row(0, 0, 0.1),
            broken,
            parallel_row(2, 0, 0.1),
            parallel_row(3, 0, 0.1),
        ];

        let planned = plan_rows(&rows);
        assert!(planned[0].base.is_ok());
        assert!(planned[1].base.as_ref().unwrap_err().to_string().contains("not finite"));
        for row in &planned[2..] {
            let err = row.base.as_ref().unwrap_err();
            assert!(err.to_string().contains("earlier period 1"));
        }
    }

    #[test]
    fn test_period_lengths_are_distinct_and_valid() {
        let mut quarterly = parallel_row(0, 1, 0.1);
        quarterly.scenario.period_length = 0.25;
        let mut broken = parallel_row(0, 2, 0.1);
        broken.scenario.period_length = 0.0;
        let rows = vec![parallel_row(0, 0, 0.1), quarterly, parallel_row(1, 0, 0.1), broken];

        assert_eq!(period_lengths(&rows), vec![0.25, 1.0]);
    }

    #[test]
    fn test_period_end_dates() {
        let start = date(2025, 4, 30);
        assert_eq!(period_end_date(start, &scenario(0, 0)).unwrap(), date(2026, 4, 30));
        assert_eq!(period_end_date(start, &scenario(2, 0)).unwrap(), date(2028, 4, 30));

        let mut quarterly = scenario(1, 0);
        quarterly.period_length = 0.25;
        assert_eq!(period_end_date(start, &quarterly).unwrap(), date(2025, 10, 30));

        let mut broken = scenario(0, 0);
        broken.period_length = 0.0;
        assert!(period_end_date(start, &broken).unwrap_err().is_validation());
    }

    #[test]
    fn test_shocked_curve_unknown_tenor() {
        let base = RateCurve::new([(1, 4.0), (10, 4.0)]).unwrap();
        let cumulative: ShockMap = [(1, -0.25), (10, -0.25)].into_iter().collect();
        let shocked = shocked_curve(&base, &cumulative).unwrap();
        assert_relative_eq!(shocked.rate_at(5.0), 3.75);

        let cumulative: ShockMap = [(7, 0.1)].into_iter().collect();
        assert!(matches!(
            shocked_curve(&base, &cumulative),
            Err(CurveError::UnknownTenor { tenor: 7, .. })
        ));
    }
}
