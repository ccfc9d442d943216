//! Scenario runs against an in-memory repository.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use approx::assert_relative_eq;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use bondstress_bonds::{PresentValueEngine, YieldSolver};
use bondstress_core::{Date, Frequency};
use bondstress_curves::RateCurve;
use bondstress_ext_file::InMemoryRepository;
use bondstress_scenario::{
    portfolio_trend, shocked_curve, ParallelShift, ScenarioConfig, ScenarioError,
    ScenarioOrchestrator,
};
use bondstress_traits::{
    CurvePoint, CurvePointShock, CurvePointStore, Position, PositionStore, ResultStore,
    ScenarioRow, ScenarioRunKey, ScenarioStore, Security, SecurityStore, StressScenario,
    StressScenarioDescription,
};

const CURVE: &str = "USD_SWAP";
const SCENARIO: &str = "USD_SWAP_SHIFT_04";

fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

fn position_date() -> Date {
    date(2025, 4, 30)
}

fn security(id: &str, coupon: f64, maturity: Date) -> Security {
    Security {
        identifier: id.into(),
        asset_name: None,
        coupon_rate: coupon,
        frequency: Frequency::SemiAnnual,
        maturity,
    }
}

fn lot(lot_id: i64, security_id: &str, quantity: Decimal, book_price: Decimal) -> Position {
    let notional = quantity * book_price / dec!(100);
    Position {
        portfolio: "USIG01".into(),
        position_date: position_date(),
        lot_id,
        security_id: security_id.into(),
        quantity,
        book_price,
        notional_amount: notional,
        par_value: quantity,
        book_value: notional,
        discounted_value: None,
        risk_core: None,
    }
}

fn parallel_rows(name: &str, shocks: &[f64], tenors: &[u32]) -> Vec<ScenarioRow> {
    shocks
        .iter()
        .enumerate()
        .map(|(period, &size)| ScenarioRow {
            scenario: StressScenario {
                scenario_name: name.into(),
                period_number: period as u32,
                simulation_number: 0,
                period_length: 1.0,
            },
            shocks: tenors
                .iter()
                .map(|&tenor| CurvePointShock {
                    curve_name: CURVE.into(),
                    as_of: position_date(),
                    tenor,
                    shock_size: size,
                })
                .collect(),
        })
        .collect()
}

async fn add_scenario(repo: &InMemoryRepository, name: &str, rows: Vec<ScenarioRow>) {
    repo.insert_scenario(
        StressScenarioDescription {
            name: name.into(),
            description: Some("parallel shift".to_string()),
        },
        rows,
    )
    .await
    .unwrap();
}

/// Flat 4% curve, one 10y 5% semi-annual lot of 1,000,000 at 99 and a
/// three period parallel down shift.
async fn seeded_repository() -> Arc<InMemoryRepository> {
    let repo = Arc::new(InMemoryRepository::new());

    repo.insert_curve_points(
        (1..=30)
            .map(|tenor| CurvePoint {
                curve_name: CURVE.into(),
                as_of: position_date(),
                tenor,
                rate: 4.0,
            })
            .collect(),
    )
    .await
    .unwrap();
    repo.insert_securities(vec![security("BOND10Y", 5.0, date(2035, 4, 30))])
        .await
        .unwrap();
    repo.upsert_positions(vec![lot(1, "BOND10Y", dec!(1000000), dec!(99))])
        .await
        .unwrap();

    let tenors: Vec<u32> = (1..=30).collect();
    add_scenario(&repo, SCENARIO, parallel_rows(SCENARIO, &[-0.25, -0.25, -0.05], &tenors)).await;
    repo
}

fn run_key() -> ScenarioRunKey {
    ScenarioRunKey::new("USIG01", position_date(), SCENARIO)
}

fn flat(rate: f64) -> RateCurve {
    RateCurve::new((1..=30).map(|t| (t, rate))).unwrap()
}

#[tokio::test]
async fn test_end_to_end_parallel_shift() {
    let repo = seeded_repository().await;
    let orchestrator = ScenarioOrchestrator::new(Arc::clone(&repo));

    let run = orchestrator
        .generate_scenario_positions(&run_key())
        .await
        .unwrap();

    let report = &run.report;
    assert!(report.complete);
    assert!(report.persisted);
    assert_eq!(report.rows_total, 3);
    assert_eq!(report.rows_processed, 3);
    assert_eq!(report.positions_generated, 3);
    assert_eq!(report.excluded_matured, 0);
    assert_eq!(report.convergence_failures, 0);
    assert!(report.failed_rows.is_empty());

    let expected_rates = [3.75, 3.50, 3.45];
    let expected_prices = [dec!(99.1), dec!(99.2), dec!(99.3)];
    let solver = YieldSolver::new();

    for (p, position) in run.positions.iter().enumerate() {
        let period_end = date(2026 + p as i32, 4, 30);
        assert_eq!(position.scenario.period_number, p as u32);
        assert_eq!(position.period_end_date, period_end);
        assert_eq!(position.book_price, expected_prices[p]);
        assert_eq!(position.par_value, dec!(1000000));
        assert_eq!(
            position.notional_amount,
            expected_prices[p] * dec!(10000)
        );
        assert_eq!(position.book_value, position.notional_amount);

        // on a flat curve the PV is the price at that yield
        let pv = solver
            .dirty_price_from_yield(
                expected_rates[p],
                5.0,
                period_end,
                date(2035, 4, 30),
                Frequency::SemiAnnual,
            )
            .unwrap();
        assert_relative_eq!(
            position.discounted_value.to_f64().unwrap(),
            pv * 10_000.0,
            max_relative = 1e-9
        );

        let risk = &run.risk_scenarios[p];
        assert_eq!(risk.key, position.risk_scenario);
        assert_relative_eq!(risk.metrics.price, expected_prices[p].to_f64().unwrap());
        assert_relative_eq!(risk.metrics.accrued_interest, 0.0, epsilon = 1e-12);
        assert!(!risk.metrics.ytm_fallback);
        assert!(risk.metrics.yield_to_maturity > 5.0);
        assert_eq!(risk.metrics.oas, 0.0);
    }

    // the stored set is what the run returned
    let stored = repo.get_scenario_positions(&run_key()).await.unwrap();
    assert_eq!(stored, run.positions);
    let risks = repo.get_risk_scenarios(&run_key()).await.unwrap();
    assert_eq!(risks, run.risk_scenarios);
}

#[test]
fn test_shocked_curves_accumulate() {
    let base = flat(4.0);
    let tenors: Vec<u32> = (1..=30).collect();
    let rows = parallel_rows(SCENARIO, &[-0.25, -0.25, -0.05], &tenors);

    let mut cumulative: BTreeMap<u32, f64> = BTreeMap::new();
    let mut rates = Vec::new();
    for row in &rows {
        for shock in &row.shocks {
            *cumulative.entry(shock.tenor).or_insert(0.0) += shock.shock_size;
        }
        rates.push(shocked_curve(&base, &cumulative).unwrap().rate_at(7.0));
    }

    assert_relative_eq!(rates[0], 3.75, epsilon = 1e-12);
    assert_relative_eq!(rates[1], 3.50, epsilon = 1e-12);
    assert_relative_eq!(rates[2], 3.45, epsilon = 1e-12);
}

#[tokio::test]
async fn test_trend_from_stored_run() {
    let repo = seeded_repository().await;
    let orchestrator = ScenarioOrchestrator::new(Arc::clone(&repo));
    let run = orchestrator
        .generate_scenario_positions(&run_key())
        .await
        .unwrap();

    let trend = orchestrator.portfolio_stress_trend(&run_key()).await.unwrap();
    assert_eq!(trend, portfolio_trend(&run.positions));
    assert_eq!(trend.len(), 3);
    assert_eq!(trend[0].date, date(2026, 4, 30));
    assert_eq!(trend[2].date, date(2028, 4, 29));
    assert_eq!(trend[1].market_value, run.positions[1].discounted_value);
}

#[tokio::test]
async fn test_reruns_are_idempotent() {
    let repo = seeded_repository().await;
    let orchestrator = ScenarioOrchestrator::new(Arc::clone(&repo));

    orchestrator
        .generate_scenario_positions(&run_key())
        .await
        .unwrap();
    let first = repo.get_scenario_positions(&run_key()).await.unwrap();

    orchestrator
        .generate_scenario_positions(&run_key())
        .await
        .unwrap();
    let second = repo.get_scenario_positions(&run_key()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(second.len(), 3);
}

#[tokio::test]
async fn test_sequential_matches_parallel() {
    let repo = seeded_repository().await;
    repo.upsert_positions(vec![lot(2, "BOND10Y", dec!(250000), dec!(102.5))])
        .await
        .unwrap();

    let parallel = ScenarioOrchestrator::new(Arc::clone(&repo))
        .generate_scenario_positions(&run_key())
        .await
        .unwrap();
    let sequential = ScenarioOrchestrator::new(Arc::clone(&repo))
        .with_config(ScenarioConfig {
            parallel: false,
            ..ScenarioConfig::default()
        })
        .generate_scenario_positions(&run_key())
        .await
        .unwrap();

    assert_eq!(parallel.positions, sequential.positions);
    assert_eq!(parallel.positions.len(), 6);
}

#[tokio::test]
async fn test_matured_lots_are_excluded() {
    let repo = seeded_repository().await;
    repo.insert_securities(vec![security("BOND2027", 4.0, date(2027, 1, 15))])
        .await
        .unwrap();
    repo.upsert_positions(vec![lot(2, "BOND2027", dec!(500000), dec!(100))])
        .await
        .unwrap();

    let run = ScenarioOrchestrator::new(Arc::clone(&repo))
        .generate_scenario_positions(&run_key())
        .await
        .unwrap();

    assert_eq!(run.report.excluded_matured, 2);
    assert_eq!(run.positions.len(), 4);
    for position in &run.positions {
        if position.lot_id == 2 {
            assert_eq!(position.scenario.period_number, 0);
        }
        assert!(position.period_end_date <= date(2035, 4, 30));
    }
}

#[tokio::test]
async fn test_zero_shock_matches_baseline() {
    let repo = seeded_repository().await;
    let tenors: Vec<u32> = (1..=30).collect();
    add_scenario(&repo, "FLAT", parallel_rows("FLAT", &[0.0, 0.0], &tenors)).await;

    let orchestrator = ScenarioOrchestrator::new(Arc::clone(&repo));
    let baseline = orchestrator
        .value_positions(&"USIG01".into(), position_date(), &CURVE.into())
        .await
        .unwrap();

    let zero: BTreeMap<u32, f64> = tenors.iter().map(|&t| (t, 0.0)).collect();
    let unshocked = shocked_curve(&flat(4.0), &zero).unwrap();
    let pv = PresentValueEngine::present_value(
        position_date(),
        date(2035, 4, 30),
        5.0,
        &unshocked,
        Frequency::SemiAnnual,
    )
    .unwrap();

    let core = &baseline.risk_cores[0];
    assert_relative_eq!(core.metrics.discounted_pv, pv, epsilon = 1e-12);
    assert_relative_eq!(core.metrics.price, 99.0);

    // positions carry the baseline value and reference
    let stored = repo
        .get_positions(&"USIG01".into(), position_date())
        .await
        .unwrap();
    assert_eq!(stored[0].risk_core.as_ref(), Some(&core.key));
    assert_relative_eq!(
        stored[0].discounted_value.unwrap().to_f64().unwrap(),
        pv * 10_000.0,
        max_relative = 1e-9
    );
    assert!(repo.get_risk_core(&core.key).await.is_ok());

    // a zero-shock period values against the base curve
    let run = orchestrator
        .generate_scenario_positions(&ScenarioRunKey::new("USIG01", position_date(), "FLAT"))
        .await
        .unwrap();
    let first = &run.risk_scenarios[0];
    let base_pv = PresentValueEngine::present_value(
        date(2026, 4, 30),
        date(2035, 4, 30),
        5.0,
        &flat(4.0),
        Frequency::SemiAnnual,
    )
    .unwrap();
    assert_relative_eq!(first.metrics.discounted_pv, base_pv, epsilon = 1e-12);
}

#[tokio::test]
async fn test_expired_deadline_is_not_persisted() {
    let repo = seeded_repository().await;
    let orchestrator = ScenarioOrchestrator::new(Arc::clone(&repo));

    let run = orchestrator
        .generate_with_deadline(&run_key(), Some(Duration::ZERO))
        .await
        .unwrap();

    assert!(!run.report.complete);
    assert!(!run.report.persisted);
    assert_eq!(run.report.rows_processed, 0);
    assert!(run.positions.is_empty());
    assert!(repo
        .get_scenario_positions(&run_key())
        .await
        .unwrap_err()
        .is_missing_data());
}

#[tokio::test]
async fn test_truncated_run_keeps_previous_result() {
    let repo = seeded_repository().await;
    let orchestrator = ScenarioOrchestrator::new(Arc::clone(&repo));

    let complete = orchestrator
        .generate_scenario_positions(&run_key())
        .await
        .unwrap();
    orchestrator
        .generate_with_deadline(&run_key(), Some(Duration::ZERO))
        .await
        .unwrap();

    let stored = repo.get_scenario_positions(&run_key()).await.unwrap();
    assert_eq!(stored, complete.positions);
}

#[tokio::test]
async fn test_missing_inputs() {
    let repo = seeded_repository().await;
    let orchestrator = ScenarioOrchestrator::new(Arc::clone(&repo));

    let err = orchestrator
        .generate_scenario_positions(&ScenarioRunKey::new("NOPE", position_date(), SCENARIO))
        .await
        .unwrap_err();
    assert!(err.is_missing_data());

    let err = orchestrator
        .generate_scenario_positions(&ScenarioRunKey::new("USIG01", position_date(), "NOPE"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScenarioError::MissingData { .. }));

    let err = orchestrator
        .value_positions(&"USIG01".into(), position_date(), &"EUR_SWAP".into())
        .await
        .unwrap_err();
    assert!(err.is_missing_data());
}

#[tokio::test]
async fn test_bad_rows_fail_alone() {
    let repo = seeded_repository().await;

    // path 0 shocks a tenor the curve does not have, path 1 points at a
    // snapshot that was never loaded, path 2 is clean
    let mut rows = Vec::new();
    for simulation in 0..3 {
        let mut path = parallel_rows("BROKEN", &[-0.1], &[1, 2]);
        path[0].scenario.simulation_number = simulation;
        rows.extend(path);
    }
    rows[0].shocks[1].tenor = 40;
    for shock in &mut rows[1].shocks {
        shock.as_of = date(2025, 5, 1);
    }
    add_scenario(&repo, "BROKEN", rows).await;

    let run = ScenarioOrchestrator::new(Arc::clone(&repo))
        .generate_scenario_positions(&ScenarioRunKey::new("USIG01", position_date(), "BROKEN"))
        .await
        .unwrap();

    let failed = &run.report.failed_rows;
    assert!(run.report.complete);
    assert_eq!(run.report.rows_processed, 3);
    assert_eq!(failed.len(), 2);
    assert_eq!(failed[0].simulation_number, 0);
    assert!(failed[0].error.contains("40y"));
    assert_eq!(failed[1].simulation_number, 1);
    assert!(failed[1].error.contains("2025-05-01"));

    assert_eq!(run.positions.len(), 1);
    assert_eq!(run.positions[0].scenario.simulation_number, 2);
}

#[tokio::test]
async fn test_failed_period_fails_rest_of_path() {
    let repo = seeded_repository().await;
    let tenors: Vec<u32> = (1..=30).collect();
    let mut rows = parallel_rows("MIXED", &[-0.1, -0.1, -0.1], &tenors);
    rows[1].shocks[3].curve_name = "EUR_SWAP".into();
    add_scenario(&repo, "MIXED", rows).await;

    let run = ScenarioOrchestrator::new(Arc::clone(&repo))
        .generate_scenario_positions(&ScenarioRunKey::new("USIG01", position_date(), "MIXED"))
        .await
        .unwrap();

    let mut failed: Vec<u32> = run
        .report
        .failed_rows
        .iter()
        .map(|f| f.period_number)
        .collect();
    failed.sort_unstable();
    assert_eq!(failed, vec![1, 2]);
    assert!(run.report.persisted);

    // only the period before the broken one is valued and stored
    assert_eq!(run.positions.len(), 1);
    assert_eq!(run.positions[0].scenario.period_number, 0);
    let stored = repo
        .get_scenario_positions(&ScenarioRunKey::new("USIG01", position_date(), "MIXED"))
        .await
        .unwrap();
    assert_eq!(stored, run.positions);
}

#[tokio::test]
async fn test_period_ending_at_maturity_values_redemption() {
    let repo = seeded_repository().await;
    let tenors: Vec<u32> = (1..=30).collect();
    add_scenario(&repo, "TEN_YEARS", parallel_rows("TEN_YEARS", &[0.0; 10], &tenors)).await;

    let run = ScenarioOrchestrator::new(Arc::clone(&repo))
        .generate_scenario_positions(&ScenarioRunKey::new("USIG01", position_date(), "TEN_YEARS"))
        .await
        .unwrap();

    assert_eq!(run.report.convergence_failures, 0);
    assert_eq!(run.report.excluded_matured, 0);
    assert_eq!(run.positions.len(), 10);

    let last = &run.positions[9];
    assert_eq!(last.period_end_date, date(2035, 4, 30));
    assert_eq!(last.book_price, dec!(100));
    assert_eq!(last.discounted_value, dec!(1025000));

    let risk = &run.risk_scenarios[9];
    assert!(!risk.metrics.ytm_fallback);
    assert_relative_eq!(risk.metrics.discounted_pv, 102.5);
}

#[tokio::test]
async fn test_baseline_keeps_one_risk_core_per_book_price() {
    let repo = seeded_repository().await;
    repo.upsert_positions(vec![lot(2, "BOND10Y", dec!(500000), dec!(90))])
        .await
        .unwrap();

    let baseline = ScenarioOrchestrator::new(Arc::clone(&repo))
        .value_positions(&"USIG01".into(), position_date(), &CURVE.into())
        .await
        .unwrap();

    assert_eq!(baseline.risk_cores.len(), 2);
    assert_eq!(baseline.risk_cores[0].key.book_price, dec!(90));
    assert_relative_eq!(baseline.risk_cores[0].metrics.price, 90.0);
    assert_relative_eq!(baseline.risk_cores[1].metrics.price, 99.0);
    assert!(
        baseline.risk_cores[0].metrics.yield_to_maturity
            > baseline.risk_cores[1].metrics.yield_to_maturity
    );

    for position in &baseline.positions {
        let key = position.risk_core.as_ref().unwrap();
        assert_eq!(key.book_price, position.book_price);
        let core = repo.get_risk_core(key).await.unwrap();
        assert_relative_eq!(core.metrics.price, position.book_price.to_f64().unwrap());
    }
}

#[tokio::test]
async fn test_quarterly_periods_amortize_to_par_at_maturity() {
    let repo = seeded_repository().await;
    let tenors: Vec<u32> = (1..=30).collect();
    let mut rows = parallel_rows("QUARTERLY", &[0.0; 40], &tenors);
    for row in &mut rows {
        row.scenario.period_length = 0.25;
    }
    add_scenario(&repo, "QUARTERLY", rows).await;

    let run = ScenarioOrchestrator::new(Arc::clone(&repo))
        .generate_scenario_positions(&ScenarioRunKey::new("USIG01", position_date(), "QUARTERLY"))
        .await
        .unwrap();

    assert_eq!(run.positions.len(), 40);
    assert_eq!(run.positions[0].book_price, dec!(99.025));
    assert_eq!(run.positions[0].period_end_date, date(2025, 7, 30));
    assert_eq!(run.positions[9].book_price, dec!(99.25));
    assert_eq!(run.positions[39].book_price, dec!(100));
    assert_eq!(run.positions[39].period_end_date, date(2035, 4, 30));
    assert!(run.positions.iter().all(|p| p.book_price <= dec!(100)));
}

#[tokio::test]
async fn test_generated_parallel_family_runs_like_a_loaded_one() {
    let repo = seeded_repository().await;
    let orchestrator = ScenarioOrchestrator::new(Arc::clone(&repo));

    let shift = ParallelShift {
        scenario_name: "GENERATED".into(),
        description: Some("three period down shift".to_string()),
        curve_name: CURVE.into(),
        as_of: position_date(),
        shocks_by_period: [(0, -0.25), (1, -0.25), (2, -0.05)].into_iter().collect(),
        period_length: 1.0,
    };
    let rows = orchestrator.create_parallel_scenario(&shift).await.unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row.shocks.len() == 30));
    assert_eq!(repo.get_scenario_rows(&"GENERATED".into()).await.unwrap(), rows);

    let generated = orchestrator
        .generate_scenario_positions(&ScenarioRunKey::new("USIG01", position_date(), "GENERATED"))
        .await
        .unwrap();
    let loaded = orchestrator
        .generate_scenario_positions(&run_key())
        .await
        .unwrap();
    let values = |run: &bondstress_scenario::ScenarioRun| -> Vec<Decimal> {
        run.positions.iter().map(|p| p.discounted_value).collect()
    };
    assert_eq!(values(&generated), values(&loaded));

    // the name is taken now, and unknown snapshots are missing data
    assert!(orchestrator.create_parallel_scenario(&shift).await.is_err());
    let mut elsewhere = shift.clone();
    elsewhere.scenario_name = "EUR".into();
    elsewhere.curve_name = "EUR_SWAP".into();
    let err = orchestrator.create_parallel_scenario(&elsewhere).await.unwrap_err();
    assert!(err.is_missing_data());
}
