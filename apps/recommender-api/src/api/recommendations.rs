//! Recommendations API routes

use axum::Router;
use domain_recommender::handlers;

use crate::state::AppState;

/// Create recommendations router
pub fn router(state: &AppState) -> eyre::Result<Router> {
    let service = state.recommender()?;
    Ok(handlers::router(service))
}
