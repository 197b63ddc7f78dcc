//! API layer - routes, handlers, and middleware

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;

use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower::Layer;
use tower_http::normalize_path::NormalizePath;

/// The complete service: the router behind trailing-slash normalization.
///
/// Path normalization has to run before routing, so it wraps the router
/// instead of being one of its layers.
pub type App = NormalizePath<Router>;

/// Create the main application router
pub fn create_router(state: AppState) -> App {
    let max_body_size = state.config.server.max_request_body_size;
    let cors_origins = state.config.server.cors_origins.clone();

    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .merge(routes::record_routes())
        .with_state(state)
        // Applied in reverse order
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(middleware::compression())
        .layer(middleware::cors(&cors_origins))
        .layer(DefaultBodyLimit::max(max_body_size));

    middleware::normalize_path().layer(router)
}
