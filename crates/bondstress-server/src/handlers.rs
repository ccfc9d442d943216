//! Request handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use bondstress_core::Date;
use bondstress_ext_file::ingest::{
    load_curves, load_positions, load_scenarios, load_securities, parse_curves, parse_positions,
    parse_scenarios, parse_securities,
};
use bondstress_ext_file::InMemoryRepository;
use bondstress_scenario::{
    BaselineValuation, ParallelShift, RunReport, ScenarioOrchestrator, TrendPoint,
};
use bondstress_traits::{
    CurveName, CurvePoint, CurvePointStore, PortfolioName, Position, PositionStore, ScenarioName,
    ScenarioPosition, ScenarioRow, ScenarioRunKey, ScenarioStore, Security, SecurityStore,
    StressScenarioDescription,
};

use crate::error::ApiResult;

/// Application state.
pub struct AppState {
    /// Shared repository
    pub repository: Arc<InMemoryRepository>,
    /// Scenario engine over the repository
    pub orchestrator: ScenarioOrchestrator<InMemoryRepository>,
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check handler.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// SCENARIO RUNS
// =============================================================================

/// Request to run a scenario family over a portfolio snapshot.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Portfolio name
    pub portfolio_name: String,
    /// Snapshot date (YYYY-MM-DD)
    pub position_date: String,
    /// Scenario family name
    pub scenario_name: String,
}

/// Runs a scenario family.
///
/// Returns 201 when the result set was stored and 200 when a deadline cut
/// the run short.
pub async fn generate_scenario_positions(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> ApiResult<(StatusCode, Json<RunReport>)> {
    let key = ScenarioRunKey::new(
        request.portfolio_name,
        Date::parse(&request.position_date)?,
        request.scenario_name,
    );

    let run = state.orchestrator.generate_scenario_positions(&key).await?;
    let status = if run.report.persisted {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(run.report)))
}

/// Stored scenario positions of a run.
pub async fn get_scenario_positions(
    State(state): State<Arc<AppState>>,
    Path((portfolio, position_date, scenario_name)): Path<(String, String, String)>,
) -> ApiResult<Json<Vec<ScenarioPosition>>> {
    let key = ScenarioRunKey::new(portfolio, Date::parse(&position_date)?, scenario_name);
    Ok(Json(state.orchestrator.scenario_positions(&key).await?))
}

/// Portfolio market value per period of a stored run.
pub async fn get_portfolio_stress_trend(
    State(state): State<Arc<AppState>>,
    Path((portfolio, position_date, scenario_name)): Path<(String, String, String)>,
) -> ApiResult<Json<Vec<TrendPoint>>> {
    let key = ScenarioRunKey::new(portfolio, Date::parse(&position_date)?, scenario_name);
    Ok(Json(state.orchestrator.portfolio_stress_trend(&key).await?))
}

// =============================================================================
// BASELINE
// =============================================================================

/// Request to value a snapshot against an unshocked curve.
#[derive(Debug, Deserialize)]
pub struct ValuePositionsRequest {
    /// Portfolio name
    pub portfolio_name: String,
    /// Snapshot date (YYYY-MM-DD)
    pub position_date: String,
    /// Curve to discount with
    pub curve_name: String,
}

/// Values a portfolio snapshot at book price.
pub async fn value_positions(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ValuePositionsRequest>,
) -> ApiResult<Json<BaselineValuation>> {
    let valuation = state
        .orchestrator
        .value_positions(
            &PortfolioName::new(request.portfolio_name),
            Date::parse(&request.position_date)?,
            &CurveName::new(request.curve_name),
        )
        .await?;
    Ok(Json(valuation))
}

/// Curve points of one snapshot, ascending in tenor.
pub async fn get_curve_by_date(
    State(state): State<Arc<AppState>>,
    Path((curve_name, adate)): Path<(String, String)>,
) -> ApiResult<Json<Vec<CurvePoint>>> {
    let points = state
        .repository
        .get_curve_points(&CurveName::new(curve_name), Date::parse(&adate)?)
        .await?;
    Ok(Json(points))
}

// =============================================================================
// REFERENCE DATA
// =============================================================================

/// Lots of a portfolio snapshot, ordered by lot id.
pub async fn get_positions(
    State(state): State<Arc<AppState>>,
    Path((portfolio, position_date)): Path<(String, String)>,
) -> ApiResult<Json<Vec<Position>>> {
    let positions = state
        .repository
        .get_positions(&PortfolioName::new(portfolio), Date::parse(&position_date)?)
        .await?;
    Ok(Json(positions))
}

/// Every stored security.
pub async fn list_securities(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Security>>> {
    Ok(Json(state.repository.list_securities().await?))
}

/// Names and descriptions of the stored scenario families.
pub async fn list_stress_scenarios(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<StressScenarioDescription>>> {
    Ok(Json(state.repository.list_scenarios().await?))
}

/// Rows of one scenario family with their shocks.
pub async fn get_stress_scenario(
    State(state): State<Arc<AppState>>,
    Path(scenario_name): Path<String>,
) -> ApiResult<Json<Vec<ScenarioRow>>> {
    let rows = state
        .repository
        .get_scenario_rows(&ScenarioName::new(scenario_name))
        .await?;
    Ok(Json(rows))
}

/// Builds and stores a parallel shift family on a stored curve snapshot.
pub async fn create_parallel_scenario(
    State(state): State<Arc<AppState>>,
    Json(shift): Json<ParallelShift>,
) -> ApiResult<(StatusCode, Json<Vec<ScenarioRow>>)> {
    let rows = state.orchestrator.create_parallel_scenario(&shift).await?;
    Ok((StatusCode::CREATED, Json(rows)))
}

// =============================================================================
// UPLOADS
// =============================================================================

/// Rows accepted by an upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Records written
    pub loaded: usize,
}

fn created(loaded: usize, what: &str) -> (StatusCode, Json<UploadResponse>) {
    info!(loaded, kind = what, "upload stored");
    (StatusCode::CREATED, Json(UploadResponse { loaded }))
}

/// Uploads curve points (`adate,curve_name,year,rate`).
pub async fn upload_curves(
    State(state): State<Arc<AppState>>,
    body: String,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let points = parse_curves(body.as_bytes())?;
    let loaded = load_curves(state.repository.as_ref(), points).await?;
    Ok(created(loaded, "curves"))
}

/// Uploads securities.
pub async fn upload_securities(
    State(state): State<Arc<AppState>>,
    body: String,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let securities = parse_securities(body.as_bytes())?;
    let loaded = load_securities(state.repository.as_ref(), securities).await?;
    Ok(created(loaded, "securities"))
}

/// Uploads portfolio lots.
pub async fn upload_positions(
    State(state): State<Arc<AppState>>,
    body: String,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let positions = parse_positions(body.as_bytes())?;
    let loaded = load_positions(state.repository.as_ref(), positions).await?;
    Ok(created(loaded, "positions"))
}

/// Uploads stress scenarios; `loaded` counts scenario rows.
pub async fn upload_stress_scenarios(
    State(state): State<Arc<AppState>>,
    body: String,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let scenarios = parse_scenarios(body.as_bytes())?;
    let loaded = load_scenarios(state.repository.as_ref(), scenarios).await?;
    Ok(created(loaded, "stress scenarios"))
}
