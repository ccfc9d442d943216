//! # Bondstress Scenario
//!
//! Multi-period interest rate stress engine.
//!
//! This crate provides:
//! - [`ShockAccumulator`]: Running per-tenor shock totals along a simulation path
//! - [`ScenarioOrchestrator`]: Scenario runs and baseline valuation over a
//!   [`Repository`](bondstress_traits::Repository)
//! - [`portfolio_trend`]: Portfolio market value per scenario period
//! - [`parallel_scenario`]: Parallel shift families built on a curve snapshot
//! - [`ScenarioConfig`]: Solver, deadline and scheduling settings
//!
//! ## Usage
//!
//! ```ignore
//! let orchestrator = ScenarioOrchestrator::new(repository).with_config(config);
//!
//! let key = ScenarioRunKey::new("USIG01", position_date, "USD_SWAP_SHIFT_04");
//! let run = orchestrator.generate_scenario_positions(&key).await?;
//! let trend = orchestrator.portfolio_stress_trend(&key).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod baseline;
pub mod config;
pub mod error;
pub mod generate;
pub mod orchestrator;
pub mod shocks;
pub mod trend;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::baseline::BaselineValuation;
    pub use crate::config::ScenarioConfig;
    pub use crate::error::{ScenarioError, ScenarioResult};
    pub use crate::generate::{parallel_scenario, ParallelShift};
    pub use crate::orchestrator::{RunReport, ScenarioOrchestrator, ScenarioRun};
    pub use crate::shocks::{ShockAccumulator, ShockMap};
    pub use crate::trend::{portfolio_trend, TrendPoint};
}

pub use baseline::BaselineValuation;
pub use config::ScenarioConfig;
pub use error::{ScenarioError, ScenarioResult};
pub use generate::{parallel_scenario, ParallelShift};
pub use orchestrator::{
    period_end_date, shocked_curve, RowFailure, RunReport, ScenarioOrchestrator, ScenarioRun,
};
pub use shocks::{ShockAccumulator, ShockMap};
pub use trend::{portfolio_trend, trend_date, TrendPoint};
