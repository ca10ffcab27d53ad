//! Router configuration for the HTTP API.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

/// Create the API router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/index", post(handlers::index_urls))
        .route("/api/status", get(handlers::batch_status))
        .route(
            "/api/history",
            get(handlers::get_history).delete(handlers::clear_history),
        )
        .route("/api/health", get(handlers::health))
        .route("/api/extract-urls", post(handlers::extract_urls))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
