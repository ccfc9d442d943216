//! Portfolio market value trend across scenario periods.

use std::collections::BTreeMap;

use bondstress_core::Date;
use bondstress_traits::ScenarioPosition;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Portfolio discounted value at the end of one scenario period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Calendar date of the period end.
    pub date: Date,
    /// Sum of discounted values across the period's scenario positions.
    pub market_value: Decimal,
    /// Scenario period.
    pub period_number: u32,
    /// Simulation path.
    pub simulation_number: u32,
}

/// Calendar date of a trend point: `(period + 1) × length × 365` days after
/// the position date, rounded to the nearest day.
pub fn trend_date(position_date: Date, period_number: u32, period_length: f64) -> Date {
    let days = (f64::from(period_number + 1) * period_length * 365.0).round() as i64;
    position_date.add_days(days)
}

/// Aggregates scenario positions into one point per (simulation, period).
///
/// Points are ordered by simulation path, then period. Input order does not
/// matter.
pub fn portfolio_trend(rows: &[ScenarioPosition]) -> Vec<TrendPoint> {
    let mut totals: BTreeMap<(u32, u32), TrendPoint> = BTreeMap::new();

    for row in rows {
        let scenario = &row.scenario;
        totals
            .entry((scenario.simulation_number, scenario.period_number))
            .or_insert_with(|| TrendPoint {
                date: trend_date(
                    row.position_date,
                    scenario.period_number,
                    scenario.period_length,
                ),
                market_value: Decimal::ZERO,
                period_number: scenario.period_number,
                simulation_number: scenario.simulation_number,
            })
            .market_value += row.discounted_value;
    }

    totals.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bondstress_traits::{RiskScenarioKey, StressScenario};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn row(lot_id: i64, period: u32, simulation: u32, value: Decimal) -> ScenarioPosition {
        ScenarioPosition {
            portfolio: "USIG01".into(),
            position_date: date(2025, 4, 30),
            scenario: StressScenario {
                scenario_name: "USD_SWAP_SHIFT_04".into(),
                period_number: period,
                simulation_number: simulation,
                period_length: 1.0,
            },
            period_end_date: date(2026 + period as i32, 4, 30),
            lot_id,
            security_id: "BOND10Y".into(),
            quantity: dec!(1000000),
            book_price: dec!(99.1),
            notional_amount: dec!(991000),
            par_value: dec!(1000000),
            book_value: dec!(991000),
            discounted_value: value,
            risk_scenario: RiskScenarioKey {
                lot_id,
                period_number: period,
                simulation_number: simulation,
            },
        }
    }

    #[test]
    fn test_trend_dates() {
        let start = date(2025, 4, 30);
        assert_eq!(trend_date(start, 0, 1.0), date(2026, 4, 30));
        assert_eq!(trend_date(start, 1, 1.0), date(2027, 4, 30));
        // 2028 is a leap year
        assert_eq!(trend_date(start, 2, 1.0), date(2028, 4, 29));
        assert_eq!(trend_date(start, 0, 0.25), start.add_days(91));
    }

    #[test]
    fn test_sums_per_period() {
        let rows = vec![
            row(2, 1, 0, dec!(300)),
            row(1, 0, 0, dec!(100)),
            row(2, 0, 0, dec!(200)),
            row(1, 1, 0, dec!(50)),
        ];

        let trend = portfolio_trend(&rows);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].period_number, 0);
        assert_eq!(trend[0].market_value, dec!(300));
        assert_eq!(trend[1].period_number, 1);
        assert_eq!(trend[1].market_value, dec!(350));
        assert_eq!(trend[1].date, date(2027, 4, 30));
    }

    #[test]
    fn test_simulation_paths_are_separate() {
        let rows = vec![row(1, 0, 1, dec!(10)), row(1, 0, 0, dec!(20))];

        let trend = portfolio_trend(&rows);
        assert_eq!(trend.len(), 2);
        assert_eq!(
            (trend[0].simulation_number, trend[0].market_value),
            (0, dec!(20))
        );
        assert_eq!(
            (trend[1].simulation_number, trend[1].market_value),
            (1, dec!(10))
        );
    }

    #[test]
    fn test_json_shape() {
        let trend = portfolio_trend(&[row(1, 0, 0, dec!(1012345.5))]);
        let json = serde_json::to_value(&trend[0]).unwrap();
        assert_eq!(json["date"], "2026-04-30");
        assert_eq!(json["market_value"], 1012345.5);
        assert_eq!(json["period_number"], 0);
    }
}
