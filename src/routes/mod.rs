mod health;
mod quiz;

use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::Router;

use crate::response::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/quiz", get(quiz::view))
        .route("/api/quiz/difficulty", put(quiz::set_difficulty))
        .route("/api/quiz/next", post(quiz::next))
        .route("/api/quiz/guess", post(quiz::guess))
        .route("/api/quiz/history", get(quiz::history))
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> Response {
    AppError::not_found("route not found").into_response()
}
