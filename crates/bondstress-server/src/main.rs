//! Bondstress server entry point.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bondstress_ext_file::InMemoryRepository;
use bondstress_server::{seed_repository, Server, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,bondstress=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Bondstress Server v{}", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/bondstress.toml".to_string());

    let server_config = if std::path::Path::new(&config_path).exists() {
        info!("Loading configuration from {}", config_path);
        ServerConfig::from_file(&config_path)?
    } else {
        info!("Using default configuration");
        ServerConfig::default()
    };

    let repository = Arc::new(InMemoryRepository::new());
    seed_repository(&server_config, &repository).await?;
    info!(
        curves = repository.curve_count(),
        securities = repository.security_count(),
        "repository ready"
    );

    let server = Server::new(server_config, repository);
    server.start().await?;

    Ok(())
}
