//! Storage traits for persistence.
//!
//! - [`CurvePointStore`]: Rate curve snapshots (append-only)
//! - [`SecurityStore`]: Bond terms (immutable)
//! - [`PositionStore`]: Portfolio lots
//! - [`ScenarioStore`]: Stress scenario families with their shocks
//! - [`ResultStore`]: Computed scenario positions and risk records
//!
//! Lookups report absent keys as [`RepositoryError::MissingData`] rather
//! than returning empty collections. Listings return whatever exists.
//!
//! [`RepositoryError::MissingData`]: crate::error::RepositoryError::MissingData

use async_trait::async_trait;
use bondstress_core::Date;

use crate::error::RepositoryResult;
use crate::ids::{
    CurveName, PortfolioName, RiskCoreKey, ScenarioName, ScenarioRunKey, SecurityId,
};
use crate::records::{
    CurvePoint, Position, RiskCore, RiskScenario, ScenarioPosition, ScenarioRow, Security,
    StressScenarioDescription,
};

/// Rate curve snapshot storage.
#[async_trait]
pub trait CurvePointStore: Send + Sync {
    /// Points of one curve snapshot, ordered by tenor.
    async fn get_curve_points(
        &self,
        curve_name: &CurveName,
        as_of: Date,
    ) -> RepositoryResult<Vec<CurvePoint>>;

    /// Inserts new points. Fails with `Conflict` without writing anything if
    /// any (curve, date, tenor) already exists or repeats within the batch.
    async fn insert_curve_points(&self, points: Vec<CurvePoint>) -> RepositoryResult<usize>;
}

/// Security master storage.
#[async_trait]
pub trait SecurityStore: Send + Sync {
    /// Looks up one security.
    async fn get_security(&self, id: &SecurityId) -> RepositoryResult<Security>;

    /// Every stored security, ordered by identifier. Empty when none exist.
    async fn list_securities(&self) -> RepositoryResult<Vec<Security>>;

    /// Inserts new securities. Re-inserting identical terms is a no-op;
    /// different terms under an existing identifier fail with `Conflict`.
    /// Returns the number of newly stored securities.
    async fn insert_securities(&self, securities: Vec<Security>) -> RepositoryResult<usize>;
}

/// Portfolio position storage.
#[async_trait]
pub trait PositionStore: Send + Sync {
    /// Lots of a portfolio on a date, ordered by lot id.
    async fn get_positions(
        &self,
        portfolio: &PortfolioName,
        position_date: Date,
    ) -> RepositoryResult<Vec<Position>>;

    /// Inserts or replaces lots keyed by (portfolio, date, lot id).
    async fn upsert_positions(&self, positions: Vec<Position>) -> RepositoryResult<usize>;

    /// Replaces existing lots. Fails with `MissingData` if any lot is unknown.
    async fn update_positions(&self, positions: Vec<Position>) -> RepositoryResult<usize>;
}

/// Stress scenario storage.
#[async_trait]
pub trait ScenarioStore: Send + Sync {
    /// Periods of a scenario family with their shocks, ordered by
    /// (period number, simulation number).
    async fn get_scenario_rows(&self, name: &ScenarioName) -> RepositoryResult<Vec<ScenarioRow>>;

    /// Descriptions of every stored family, ordered by name.
    async fn list_scenarios(&self) -> RepositoryResult<Vec<StressScenarioDescription>>;

    /// Stores a new scenario family. Fails with `Conflict` if the name exists.
    async fn insert_scenario(
        &self,
        description: StressScenarioDescription,
        rows: Vec<ScenarioRow>,
    ) -> RepositoryResult<usize>;
}

/// Computed result storage. Writes replace the whole set under a key.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Replaces the scenario positions of a run.
    async fn persist_scenario_positions(
        &self,
        key: &ScenarioRunKey,
        rows: Vec<ScenarioPosition>,
    ) -> RepositoryResult<()>;

    /// Replaces the scenario risk records of a run.
    async fn persist_risk_scenarios(
        &self,
        key: &ScenarioRunKey,
        rows: Vec<RiskScenario>,
    ) -> RepositoryResult<()>;

    /// Scenario positions of a run.
    async fn get_scenario_positions(
        &self,
        key: &ScenarioRunKey,
    ) -> RepositoryResult<Vec<ScenarioPosition>>;

    /// Scenario risk records of a run.
    async fn get_risk_scenarios(&self, key: &ScenarioRunKey)
        -> RepositoryResult<Vec<RiskScenario>>;

    /// Inserts or replaces baseline risk records by key.
    async fn persist_risk_cores(&self, rows: Vec<RiskCore>) -> RepositoryResult<()>;

    /// Looks up one baseline risk record.
    async fn get_risk_core(&self, key: &RiskCoreKey) -> RepositoryResult<RiskCore>;
}

/// Everything the engine needs from storage.
pub trait Repository:
    CurvePointStore + SecurityStore + PositionStore + ScenarioStore + ResultStore
{
}

impl<T> Repository for T where
    T: CurvePointStore + SecurityStore + PositionStore + ScenarioStore + ResultStore
{
}
