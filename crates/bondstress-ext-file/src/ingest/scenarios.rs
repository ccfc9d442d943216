//! Stress scenarios:
//! `scenario_name,period_number,simulation_number,period_length,curve_name,adate,curve_year,parallel_shock_size[,shock_convention]`.
//!
//! Each line is one shock on one curve point for one (period, simulation)
//! of a scenario family. Families are stored with incremental shocks; a
//! family labelled `cumulative` is converted before it leaves the parser.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read;

use serde::Deserialize;
use tracing::info;

use bondstress_core::Date;
use bondstress_scenario::{ShockAccumulator, ShockMap};
use bondstress_traits::{
    CurveName, CurvePointShock, CurvePointStore, ScenarioName, ScenarioRow, ScenarioStore,
    ShockConvention, StressScenario, StressScenarioDescription,
};

use super::{line_of, open_reader, parse_date, require_finite};
use crate::error::{IngestError, IngestResult};

const COLUMNS: &[&str] = &[
    "scenario_name",
    "period_number",
    "simulation_number",
    "period_length",
    "curve_name",
    "adate",
    "curve_year",
    "parallel_shock_size",
];

#[derive(Debug, Deserialize)]
struct ShockRecord {
    scenario_name: String,
    period_number: u32,
    simulation_number: u32,
    period_length: f64,
    curve_name: String,
    adate: String,
    curve_year: u32,
    parallel_shock_size: f64,
    #[serde(default)]
    shock_convention: Option<ShockConvention>,
}

/// One scenario family ready to store, shocks in incremental form.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedScenario {
    /// Family description.
    pub description: StressScenarioDescription,
    /// Rows ordered by (period, simulation).
    pub rows: Vec<ScenarioRow>,
}

/// Rows of one family collected while reading, keyed by (simulation, period).
struct PendingScenario {
    convention: ShockConvention,
    periods: BTreeMap<(u32, u32), (f64, Vec<CurvePointShock>)>,
}

/// Parses scenario families.
///
/// Family lookups are scoped to this call. Cumulative families must shock
/// the same tenors in every period of a path.
pub fn parse_scenarios<R: Read>(input: R) -> IngestResult<Vec<ParsedScenario>> {
    let mut reader = open_reader(input, COLUMNS)?;
    let mut families: BTreeMap<ScenarioName, PendingScenario> = BTreeMap::new();

    for (index, result) in reader.deserialize::<ShockRecord>().enumerate() {
        let line = line_of(index);
        let record = result.map_err(|e| IngestError::invalid_row(line, e.to_string()))?;

        let convention = record.shock_convention.unwrap_or_default();
        if !record.period_length.is_finite() || record.period_length <= 0.0 {
            return Err(IngestError::invalid_row(
                line,
                format!("period_length {} is not positive", record.period_length),
            ));
        }
        let shock = CurvePointShock {
            curve_name: CurveName::new(record.curve_name),
            as_of: parse_date(line, "adate", &record.adate)?,
            tenor: record.curve_year,
            shock_size: require_finite(line, "parallel_shock_size", record.parallel_shock_size)?,
        };

        let family = families
            .entry(ScenarioName::new(record.scenario_name))
            .or_insert_with(|| PendingScenario {
                convention,
                periods: BTreeMap::new(),
            });
        if family.convention != convention {
            return Err(IngestError::invalid_row(line, "mixed shock conventions in one scenario"));
        }

        let (period_length, shocks) = family
            .periods
            .entry((record.simulation_number, record.period_number))
            .or_insert_with(|| (record.period_length, Vec::new()));
        if (*period_length - record.period_length).abs() > f64::EPSILON {
            return Err(IngestError::invalid_row(
                line,
                format!(
                    "period_length {} differs from {} for period {}",
                    record.period_length, period_length, record.period_number
                ),
            ));
        }
        if shocks
            .iter()
            .any(|s| s.curve_name == shock.curve_name && s.as_of == shock.as_of && s.tenor == shock.tenor)
        {
            return Err(IngestError::invalid_row(
                line,
                format!("duplicate shock for year {}", shock.tenor),
            ));
        }
        shocks.push(shock);
    }

    families
        .into_iter()
        .map(|(name, mut family)| -> IngestResult<ParsedScenario> {
            if family.convention == ShockConvention::Cumulative {
                to_incremental(&name, &mut family.periods)?;
            }

            let mut rows: Vec<ScenarioRow> = family
                .periods
                .into_iter()
                .map(|((simulation_number, period_number), (period_length, shocks))| ScenarioRow {
                    scenario: StressScenario {
                        scenario_name: name.clone(),
                        period_number,
                        simulation_number,
                        period_length,
                    },
                    shocks,
                })
                .collect();
            rows.sort_by_key(|row| (row.scenario.period_number, row.scenario.simulation_number));

            Ok(ParsedScenario {
                description: StressScenarioDescription {
                    name,
                    description: None,
                },
                rows,
            })
        })
        .collect()
}

/// Rewrites running totals as per-period increments, path by path.
fn to_incremental(
    name: &ScenarioName,
    periods: &mut BTreeMap<(u32, u32), (f64, Vec<CurvePointShock>)>,
) -> IngestResult<()> {
    let mut paths: BTreeMap<u32, Vec<(u32, ShockMap)>> = BTreeMap::new();
    for (&(simulation, period), (_, shocks)) in periods.iter() {
        let mut totals = ShockMap::new();
        for shock in shocks {
            if totals.insert(shock.tenor, shock.shock_size).is_some() {
                return Err(IngestError::validation(
                    "stress scenario",
                    name,
                    format!("cumulative shocks of period {period} span several curves"),
                ));
            }
        }
        paths.entry(simulation).or_default().push((period, totals));
    }

    for (simulation, path) in paths {
        let totals: Vec<ShockMap> = path.iter().map(|(_, t)| t.clone()).collect();
        ShockAccumulator::validate_tenor_sets(&totals).map_err(|e| {
            IngestError::validation(
                "stress scenario",
                name,
                format!("simulation {simulation}: {e}"),
            )
        })?;

        let increments = ShockAccumulator::decumulate(&totals);
        for ((period, _), increment) in path.iter().zip(increments) {
            if let Some((_, shocks)) = periods.get_mut(&(simulation, *period)) {
                for shock in shocks.iter_mut() {
                    if let Some(&size) = increment.get(&shock.tenor) {
                        shock.shock_size = size;
                    }
                }
            }
        }
    }
    Ok(())
}

/// Stores parsed families. Every shocked curve point must already exist and
/// family names must be new.
pub async fn load_scenarios<S>(store: &S, scenarios: Vec<ParsedScenario>) -> IngestResult<usize>
where
    S: ScenarioStore + CurvePointStore + ?Sized,
{
    let mut known_tenors: HashMap<(CurveName, Date), HashSet<u32>> = HashMap::new();

    for scenario in &scenarios {
        let name = &scenario.description.name;
        for shock in scenario.rows.iter().flat_map(|row| &row.shocks) {
            let snapshot = (shock.curve_name.clone(), shock.as_of);
            if !known_tenors.contains_key(&snapshot) {
                let tenors = match store.get_curve_points(&snapshot.0, snapshot.1).await {
                    Ok(points) => points.iter().map(|p| p.tenor).collect(),
                    Err(e) if e.is_missing_data() => HashSet::new(),
                    Err(e) => return Err(e.into()),
                };
                known_tenors.insert(snapshot.clone(), tenors);
            }
            let exists = known_tenors
                .get(&snapshot)
                .is_some_and(|tenors| tenors.contains(&shock.tenor));
            if !exists {
                return Err(IngestError::validation(
                    "stress scenario",
                    name,
                    format!(
                        "shock references unknown curve point {}@{} year {}",
                        shock.curve_name, shock.as_of, shock.tenor
                    ),
                ));
            }
        }
    }

    let mut stored = 0;
    for scenario in scenarios {
        let name = scenario.description.name.clone();
        let rows = store
            .insert_scenario(scenario.description, scenario.rows)
            .await?;
        info!(scenario = %name, rows, "stress scenario loaded");
        stored += rows;
    }
    Ok(stored)
}
