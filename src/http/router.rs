//! Router configuration for the HTTP API.
//!
//! Sets up all routes and middleware (CORS, tracing, static assets).

use std::path::Path;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the application router with all routes and middleware.
pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    // The homepage may be opened from any origin during development.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::serve_homepage))
        .route("/health", get(handlers::health_check))
        .route("/generate-schedule", post(handlers::generate_schedule))
        .route("/generate-schedule-stream", post(handlers::generate_schedule_stream))
        .route("/youtube-videos", get(handlers::youtube_videos))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
