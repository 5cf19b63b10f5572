//! Route table for the web server.

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/view", get(handlers::api_view))
        .route("/datasets/:id", get(handlers::api_dataset))
        .route("/stats", get(handlers::api_stats))
        .route("/filters", get(handlers::api_filters))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/health", get(handlers::health))
        .route("/static/style.css", get(handlers::stylesheet))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
