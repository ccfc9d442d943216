//! Route definitions.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use bondstress_ext_file::InMemoryRepository;
use bondstress_scenario::{ScenarioConfig, ScenarioOrchestrator};

use crate::handlers::{self, AppState};

/// Create the API router over an empty repository.
pub fn create_router() -> Router {
    create_router_with_repository(Arc::new(InMemoryRepository::new()), ScenarioConfig::default())
}

/// Create the API router over a shared repository.
///
/// # Arguments
/// * `repository` - Storage shared with ingestion
/// * `config` - Scenario engine settings
pub fn create_router_with_repository(
    repository: Arc<InMemoryRepository>,
    config: ScenarioConfig,
) -> Router {
    let state = Arc::new(AppState {
        orchestrator: ScenarioOrchestrator::new(Arc::clone(&repository)).with_config(config),
        repository,
    });

    Router::new()
        // Health
        .route("/health", get(handlers::health))
        .route("/api/v1/health", get(handlers::health))
        // Scenario runs
        .route("/api/v1/scenario-positions/generate", post(handlers::generate_scenario_positions))
        .route("/api/v1/scenario-positions/:portfolio/:position_date/:scenario_name", get(handlers::get_scenario_positions))
        .route("/api/v1/portfolio-stress-trend/:portfolio/:position_date/:scenario_name", get(handlers::get_portfolio_stress_trend))
        // Baseline
        .route("/api/v1/positions/value", post(handlers::value_positions))
        // Reference data
        .route("/api/v1/curves/by-date/:curve_name/:adate", get(handlers::get_curve_by_date))
        .route("/api/v1/positions/:portfolio/:position_date", get(handlers::get_positions))
        .route("/api/v1/securities", get(handlers::list_securities))
        .route("/api/v1/stress-scenarios", get(handlers::list_stress_scenarios).post(handlers::create_parallel_scenario))
        .route("/api/v1/stress-scenarios/:scenario_name", get(handlers::get_stress_scenario))
        // Uploads
        .route("/api/v1/upload/curves", post(handlers::upload_curves))
        .route("/api/v1/upload/securities", post(handlers::upload_securities))
        .route("/api/v1/upload/positions", post(handlers::upload_positions))
        .route("/api/v1/upload/stress-scenarios", post(handlers::upload_stress_scenarios))
        // State
        .with_state(state)
}
