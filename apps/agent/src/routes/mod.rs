pub mod agent;
pub mod health;

use axum::{
    http::Uri,
    routing::{delete, get, post},
    Router,
};

use crate::errors::AppError;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/agent", post(agent::handle_agent))
        .route("/session/:id", delete(agent::handle_clear_session))
        .route(
            "/index/:collection/invalidate",
            post(agent::handle_invalidate_index),
        )
        .fallback(not_found)
        .with_state(state)
}
