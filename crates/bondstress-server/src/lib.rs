//! # Bondstress Server
//!
//! REST server for the bondstress scenario engine.
//!
//! ## Features
//!
//! - Scenario runs, stored scenario positions and portfolio stress trends
//! - Baseline valuation of a portfolio snapshot
//! - CSV upload of curves, securities, positions and stress scenarios
//! - Configuration via TOML file, with optional seed files loaded at startup
//!
//! ## Usage
//!
//! ```ignore
//! use bondstress_server::{Server, ServerConfig};
//!
//! let server = Server::new(config, repository);
//! server.start().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;

use std::fs::File;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use bondstress_ext_file::ingest::{
    load_curves, load_positions, load_scenarios, load_securities, parse_curves, parse_positions,
    parse_scenarios, parse_securities,
};
use bondstress_ext_file::{IngestResult, InMemoryRepository};

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};

/// The bondstress server.
pub struct Server {
    config: ServerConfig,
    repository: Arc<InMemoryRepository>,
}

impl Server {
    /// Create a new server.
    pub fn new(config: ServerConfig, repository: Arc<InMemoryRepository>) -> Self {
        Self { config, repository }
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        routes::create_router_with_repository(
            Arc::clone(&self.repository),
            self.config.scenario.clone(),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
    }

    /// Start the server.
    pub async fn start(&self) -> Result<(), std::io::Error> {
        let addr = SocketAddr::new(
            self.config.host.parse().unwrap_or([0, 0, 0, 0].into()),
            self.config.port,
        );

        info!("Starting bondstress server on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router()).await
    }
}

/// Loads the configured seed files in dependency order: curves,
/// securities, positions, then scenarios.
pub async fn seed_repository(
    config: &ServerConfig,
    repository: &InMemoryRepository,
) -> IngestResult<()> {
    if let Some(path) = &config.curves_file {
        let loaded = load_curves(repository, parse_curves(File::open(path)?)?).await?;
        info!(path = %path, loaded, "seeded curve points");
    }
    if let Some(path) = &config.securities_file {
        let loaded = load_securities(repository, parse_securities(File::open(path)?)?).await?;
        info!(path = %path, loaded, "seeded securities");
    }
    if let Some(path) = &config.positions_file {
        let loaded = load_positions(repository, parse_positions(File::open(path)?)?).await?;
        info!(path = %path, loaded, "seeded positions");
    }
    if let Some(path) = &config.scenarios_file {
        let loaded = load_scenarios(repository, parse_scenarios(File::open(path)?)?).await?;
        info!(path = %path, loaded, "seeded scenario rows");
    }
    Ok(())
}
