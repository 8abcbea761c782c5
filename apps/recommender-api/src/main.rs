//! Recommender API - REST server

use std::time::Duration;

use axum::middleware;
use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use eyre::WrapErr;
use observability::{init_metrics, metrics_middleware};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);
    init_metrics().wrap_err("failed to install Prometheus recorder")?;

    info!(
        workspace = %config.workspace.url,
        index = %config.recommender.index_name,
        "Configuration loaded"
    );

    let state = AppState::new(config)?;

    // Build REST router
    let api_routes = api::routes(&state)?;
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;
    let app = router
        .merge(health_router(state.config.app.clone()))
        .merge(api::metrics_router())
        .layer(middleware::from_fn(metrics_middleware));

    info!(
        "Starting {} v{} on port {}",
        state.config.app.name, state.config.app.version, state.config.server.port
    );

    create_production_app(app, &state.config.server, Duration::from_secs(30), async {
        info!("Shutdown signal received, draining connections");
    })
    .await
    .wrap_err("server error")?;

    info!("Recommender API shutdown complete");
    Ok(())
}
