//! In-memory repository.
//!
//! Implements every storage trait over concurrent maps. Useful for tests,
//! demos and a server seeded from CSV files. Data is not persisted across
//! restarts.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;

use bondstress_core::Date;
use bondstress_traits::{
    CurveName, CurvePoint, CurvePointStore, PortfolioName, Position, PositionStore,
    RepositoryError, RepositoryResult, ResultStore, RiskCore, RiskCoreKey, RiskScenario,
    ScenarioName, ScenarioPosition, ScenarioRow, ScenarioRunKey, ScenarioStore, Security,
    SecurityId, SecurityStore, StressScenarioDescription,
};

type SnapshotKey = (CurveName, Date);
type LotsKey = (PortfolioName, Date);

/// Repository backed by concurrent in-memory maps.
///
/// Batch writes that validate before writing (curve points, securities,
/// position updates) hold a write lock so a rejected batch leaves no trace.
///
/// # Example
///
/// ```rust
/// use bondstress_ext_file::InMemoryRepository;
///
/// let repository = InMemoryRepository::new();
/// assert_eq!(repository.curve_count(), 0);
/// ```
#[derive(Default)]
pub struct InMemoryRepository {
    curve_points: DashMap<SnapshotKey, BTreeMap<u32, CurvePoint>>,
    securities: DashMap<SecurityId, Security>,
    positions: DashMap<LotsKey, BTreeMap<i64, Position>>,
    scenarios: DashMap<ScenarioName, (StressScenarioDescription, Vec<ScenarioRow>)>,
    scenario_positions: DashMap<ScenarioRunKey, Vec<ScenarioPosition>>,
    risk_scenarios: DashMap<ScenarioRunKey, Vec<RiskScenario>>,
    risk_cores: DashMap<RiskCoreKey, RiskCore>,
    write_lock: Mutex<()>,
}

impl InMemoryRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored curve snapshots.
    pub fn curve_count(&self) -> usize {
        self.curve_points.len()
    }

    /// Number of stored securities.
    pub fn security_count(&self) -> usize {
        self.securities.len()
    }

    /// Clears all data.
    pub fn clear(&self) {
        let _guard = self.write_lock.lock();
        self.curve_points.clear();
        self.securities.clear();
        self.positions.clear();
        self.scenarios.clear();
        self.scenario_positions.clear();
        self.risk_scenarios.clear();
        self.risk_cores.clear();
    }
}

fn snapshot_label(curve_name: &CurveName, as_of: Date) -> String {
    format!("{curve_name}@{as_of}")
}

fn lots_label(portfolio: &PortfolioName, position_date: Date) -> String {
    format!("{portfolio}@{position_date}")
}

#[async_trait]
impl CurvePointStore for InMemoryRepository {
    async fn get_curve_points(
        &self,
        curve_name: &CurveName,
        as_of: Date,
    ) -> RepositoryResult<Vec<CurvePoint>> {
        self.curve_points
            .get(&(curve_name.clone(), as_of))
            .map(|points| points.values().cloned().collect())
            .ok_or_else(|| RepositoryError::missing("curve points", snapshot_label(curve_name, as_of)))
    }

    async fn insert_curve_points(&self, points: Vec<CurvePoint>) -> RepositoryResult<usize> {
        let _guard = self.write_lock.lock();

        let mut seen = HashSet::new();
        for point in &points {
            let key = (point.curve_name.clone(), point.as_of);
            let exists = self
                .curve_points
                .get(&key)
                .is_some_and(|snapshot| snapshot.contains_key(&point.tenor));
            if exists || !seen.insert((key, point.tenor)) {
                return Err(RepositoryError::conflict(
                    "curve point",
                    format!("{}/{}", snapshot_label(&point.curve_name, point.as_of), point.tenor),
                ));
            }
        }

        let inserted = points.len();
        for point in points {
            self.curve_points
                .entry((point.curve_name.clone(), point.as_of))
                .or_default()
                .insert(point.tenor, point);
        }
        Ok(inserted)
    }
}

#[async_trait]
impl SecurityStore for InMemoryRepository {
    async fn get_security(&self, id: &SecurityId) -> RepositoryResult<Security> {
        self.securities
            .get(id)
            .map(|s| s.clone())
            .ok_or_else(|| RepositoryError::missing("security", id))
    }

    async fn list_securities(&self) -> RepositoryResult<Vec<Security>> {
        let mut securities: Vec<Security> =
            self.securities.iter().map(|s| s.value().clone()).collect();
        securities.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        Ok(securities)
    }

    async fn insert_securities(&self, securities: Vec<Security>) -> RepositoryResult<usize> {
        let _guard = self.write_lock.lock();

        let mut batch: BTreeMap<SecurityId, Security> = BTreeMap::new();
        for security in securities {
            let conflicting = self
                .securities
                .get(&security.identifier)
                .map(|existing| *existing != security)
                .or_else(|| {
                    batch
                        .get(&security.identifier)
                        .map(|pending| *pending != security)
                })
                .unwrap_or(false);
            if conflicting {
                return Err(RepositoryError::conflict("security", &security.identifier));
            }
            if !self.securities.contains_key(&security.identifier) {
                batch.insert(security.identifier.clone(), security);
            }
        }

        let inserted = batch.len();
        for (id, security) in batch {
            self.securities.insert(id, security);
        }
        Ok(inserted)
    }
}

#[async_trait]
impl PositionStore for InMemoryRepository {
    async fn get_positions(
        &self,
        portfolio: &PortfolioName,
        position_date: Date,
    ) -> RepositoryResult<Vec<Position>> {
        self.positions
            .get(&(portfolio.clone(), position_date))
            .filter(|lots| !lots.is_empty())
            .map(|lots| lots.values().cloned().collect())
            .ok_or_else(|| RepositoryError::missing("positions", lots_label(portfolio, position_date)))
    }

    async fn upsert_positions(&self, positions: Vec<Position>) -> RepositoryResult<usize> {
        let written = positions.len();
        for position in positions {
            self.positions
                .entry((position.portfolio.clone(), position.position_date))
                .or_default()
                .insert(position.lot_id, position);
        }
        Ok(written)
    }

    async fn update_positions(&self, positions: Vec<Position>) -> RepositoryResult<usize> {
        let _guard = self.write_lock.lock();

        for position in &positions {
            let known = self
                .positions
                .get(&(position.portfolio.clone(), position.position_date))
                .is_some_and(|lots| lots.contains_key(&position.lot_id));
            if !known {
                return Err(RepositoryError::missing(
                    "position",
                    format!(
                        "{}/{}",
                        lots_label(&position.portfolio, position.position_date),
                        position.lot_id
                    ),
                ));
            }
        }

        let written = positions.len();
        for position in positions {
            if let Some(mut lots) = self
                .positions
                .get_mut(&(position.portfolio.clone(), position.position_date))
            {
                lots.insert(position.lot_id, position);
            }
        }
        Ok(written)
    }
}

#[async_trait]
impl ScenarioStore for InMemoryRepository {
    async fn get_scenario_rows(&self, name: &ScenarioName) -> RepositoryResult<Vec<ScenarioRow>> {
        self.scenarios
            .get(name)
            .map(|entry| entry.1.clone())
            .ok_or_else(|| RepositoryError::missing("stress scenario", name))
    }

    async fn list_scenarios(&self) -> RepositoryResult<Vec<StressScenarioDescription>> {
        let mut descriptions: Vec<StressScenarioDescription> =
            self.scenarios.iter().map(|entry| entry.0.clone()).collect();
        descriptions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(descriptions)
    }

    async fn insert_scenario(
        &self,
        description: StressScenarioDescription,
        mut rows: Vec<ScenarioRow>,
    ) -> RepositoryResult<usize> {
        rows.sort_by_key(|row| (row.scenario.period_number, row.scenario.simulation_number));
        let stored = rows.len();

        match self.scenarios.entry(description.name.clone()) {
            Entry::Occupied(_) => Err(RepositoryError::conflict(
                "stress scenario",
                &description.name,
            )),
            Entry::Vacant(slot) => {
                slot.insert((description, rows));
                Ok(stored)
            }
        }
    }
}

#[async_trait]
impl ResultStore for InMemoryRepository {
    async fn persist_scenario_positions(
        &self,
        key: &ScenarioRunKey,
        rows: Vec<ScenarioPosition>,
    ) -> RepositoryResult<()> {
        self.scenario_positions.insert(key.clone(), rows);
        Ok(())
    }

    async fn persist_risk_scenarios(
        &self,
        key: &ScenarioRunKey,
        rows: Vec<RiskScenario>,
    ) -> RepositoryResult<()> {
        self.risk_scenarios.insert(key.clone(), rows);
        Ok(())
    }

    async fn get_scenario_positions(
        &self,
        key: &ScenarioRunKey,
    ) -> RepositoryResult<Vec<ScenarioPosition>> {
        self.scenario_positions
            .get(key)
            .map(|rows| rows.clone())
            .ok_or_else(|| RepositoryError::missing("scenario positions", key))
    }

    async fn get_risk_scenarios(
        &self,
        key: &ScenarioRunKey,
    ) -> RepositoryResult<Vec<RiskScenario>> {
        self.risk_scenarios
            .get(key)
            .map(|rows| rows.clone())
            .ok_or_else(|| RepositoryError::missing("risk scenarios", key))
    }

    async fn persist_risk_cores(&self, rows: Vec<RiskCore>) -> RepositoryResult<()> {
        for row in rows {
            self.risk_cores.insert(row.key.clone(), row);
        }
        Ok(())
    }

    async fn get_risk_core(&self, key: &RiskCoreKey) -> RepositoryResult<RiskCore> {
        self.risk_cores
            .get(key)
            .map(|row| row.clone())
            .ok_or_else(|| RepositoryError::missing("risk core", key))
    }
}
