use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Largest request body `/ask` and `/translate` accept; larger ones get 413.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

pub fn create_routes(state: AppState) -> Router<AppState> {
    let system_config = &state.config.system_config;

    Router::new()
        // Health check
        .route("/api/health", get(health_check))

        // Chat and translation
        .route("/ask", post(handlers::ask))
        .route("/translate", post(handlers::translate))

        // Presentation page and its assets
        .route_service("/", ServeFile::new(&system_config.index_page))
        .nest_service("/static", ServeDir::new(&system_config.static_dir))
}

/// The complete application: routes, CORS, request tracing and state.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes(state.clone()))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model_ready": state.gateway.is_ready()
    }))
}
