pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::render::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Cards API
        .route("/api/v1/cards", post(handlers::handle_render_cards))
        .route("/api/v1/cards/:job_id", get(handlers::handle_list_cards))
        .with_state(state)
}
