//! Gateway routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{
    get_run_outputs, get_run_status, health, list_agents, start_run, upload_file, upload_from_url,
};
use crate::middleware::{cors_layer, request_id, request_logging};
use crate::state::AppState;
use crate::ui;

/// Create the gateway router.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/agents", get(list_agents))
        .route("/uploads", post(upload_file))
        .route("/uploads/url", post(upload_from_url))
        .route("/runs", post(start_run))
        .route("/runs/:run_id", get(get_run_status))
        .route("/runs/:run_id/outputs", get(get_run_outputs));

    Router::new()
        .route("/", get(ui::index))
        .route("/health", get(health))
        .nest("/api", api_routes)
        // Both limits sized for one full video upload; the axum default
        // would cap multipart reads at 2 MB
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
