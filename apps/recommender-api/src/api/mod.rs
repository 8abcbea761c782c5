//! API routes module

pub mod recommendations;

use axum::{Router, routing::get};
use observability::metrics_handler;

use crate::state::AppState;

/// Create all API routes (mounted under `/api`)
pub fn routes(state: &AppState) -> eyre::Result<Router> {
    Ok(Router::new().merge(recommendations::router(state)?))
}

/// Prometheus scrape endpoint, mounted at the root
pub fn metrics_router() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}
