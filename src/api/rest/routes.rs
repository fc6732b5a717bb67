//! # REST Routes
//!
//! Router wiring for the quote-comparison API.

use crate::api::rest::handlers::{self, AppState};
use axum::routing::get;
use axum::Router;

/// Builds the API router over the shared state.
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/quotes/", get(handlers::get_quotes))
        .route("/api/providers/", get(handlers::list_providers))
        .route("/api/providers/:id/", get(handlers::get_provider))
        .route("/api/health", get(handlers::health))
        .with_state(state)
}
