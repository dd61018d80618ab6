pub mod health;
pub mod page;
pub mod quiz;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::cors::permissive_cors;
use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route("/session", post(page::session_action))
        .route("/health", get(health::health))
        .route("/api/generate-quiz", post(quiz::generate_quiz))
        .with_state(state)
        .layer(permissive_cors())
        .layer(TraceLayer::new_for_http())
}
