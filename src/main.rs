mod adapters;
mod application;
mod config;
mod domain;
mod interface;
mod ports;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adapters::DockerCliAdapter;
use application::StatsService;
use config::Config;
use interface::http::create_router;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("dockstat={},tower_http=info", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting dockstat v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {:?}", config);

    let docker_adapter =
        DockerCliAdapter::new(config.runtime_bin.clone()).with_timeout(config.command_timeout);
    let stats_service = Arc::new(StatsService::new(Arc::new(docker_adapter)));

    // Create HTTP server
    let app = create_router(stats_service, config.api_key.clone());
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("✓ dockstat listening on {}", addr);
    info!("  → API: http://localhost:{}/stats?api_key=...", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
