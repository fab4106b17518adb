use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use unit_of_work::adapter::config::AppConfig;
use unit_of_work::adapter::init::AppInitializer;
use unit_of_work::adapter::web::create_router::create_router;
use unit_of_work::error::ApplicationError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::load()?;
    let state = AppInitializer::initialize(&config)
        .await
        .map_err(ApplicationError::from)?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .map_err(|e| ApplicationError::ServerError(e.to_string()))?;
    tracing::info!(addr = %config.bind_addr(), "server running");

    axum::serve(listener, app)
        .await
        .context("server terminated unexpectedly")?;

    Ok(())
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("unit_of_work=info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
