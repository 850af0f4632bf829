use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/habits", get(handlers::get_habits).post(handlers::add_habit))
        .route(
            "/api/habits/reorder",
            post(handlers::reorder_habits),
        )
        .route("/api/habits/reset", post(handlers::reset_habits))
        .route(
            "/api/habits/:id",
            put(handlers::update_habit).delete(handlers::delete_habit),
        )
        .route("/api/habits/:id/toggle", post(handlers::toggle_habit))
        .route("/api/progress", get(handlers::get_progress))
        .with_state(state)
}
