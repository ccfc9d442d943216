//! Scenario engine configuration.

use std::time::Duration;

use bondstress_bonds::pricing::DEFAULT_SENTINEL_YIELD;
use bondstress_bonds::YieldSolver;
use serde::{Deserialize, Serialize};

/// Solver, deadline and scheduling settings for scenario runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Price residual tolerance of the yield solver
    #[serde(default = "default_tolerance")]
    pub solver_tolerance: f64,

    /// Maximum yield solver iterations
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Yield (percent) reported when the solver does not converge
    #[serde(default = "default_sentinel_yield")]
    pub sentinel_yield: f64,

    /// Default run deadline in milliseconds
    #[serde(default)]
    pub deadline_ms: Option<u64>,

    /// Value positions on the rayon pool
    #[serde(default = "default_true")]
    pub parallel: bool,
}

fn default_tolerance() -> f64 {
    1e-10
}

fn default_max_iterations() -> u32 {
    100
}

fn default_sentinel_yield() -> f64 {
    DEFAULT_SENTINEL_YIELD
}

fn default_true() -> bool {
    true
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            solver_tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            sentinel_yield: default_sentinel_yield(),
            deadline_ms: None,
            parallel: true,
        }
    }
}

impl ScenarioConfig {
    /// Yield solver built from these settings.
    pub fn yield_solver(&self) -> YieldSolver {
        YieldSolver::new()
            .with_tolerance(self.solver_tolerance)
            .with_max_iterations(self.max_iterations)
            .with_sentinel(self.sentinel_yield)
    }

    /// Default deadline as a duration.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}
