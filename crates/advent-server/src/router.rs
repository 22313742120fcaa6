//! Axum router construction for the game API.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the game server.
///
/// CORS is wide open for local frontend development; a production
/// deployment should restrict it.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/status", get(handlers::get_status))
        .route("/api/command", post(handlers::post_command))
        .route("/api/new-game", post(handlers::post_new_game))
        .route("/api/save", post(handlers::post_save))
        .route("/api/load", post(handlers::post_load))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
