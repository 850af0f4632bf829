use crate::errors::AppError;
use crate::models::{
    AddHabitRequest, HabitsResponse, Individual, ProgressResponse, ReorderRequest, ToggleRequest,
    UpdateHabitRequest,
};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

pub async fn get_habits(State(state): State<AppState>) -> Json<HabitsResponse> {
    Json(habits_response(&state).await)
}

pub async fn get_progress(State(state): State<AppState>) -> Json<ProgressResponse> {
    Json(ProgressResponse {
        martin: state.manager.progress(Individual::Martin).await,
        elise: state.manager.progress(Individual::Elise).await,
    })
}

pub async fn add_habit(
    State(state): State<AppState>,
    Json(payload): Json<AddHabitRequest>,
) -> Result<Json<HabitsResponse>, AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("habit name must not be empty"));
    }

    state.manager.add_habit(name.to_string(), payload.person).await;
    Ok(Json(habits_response(&state).await))
}

pub async fn update_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateHabitRequest>,
) -> Result<Json<HabitsResponse>, AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("habit name must not be empty"));
    }

    state
        .manager
        .update_habit(&id, name.to_string(), payload.person)
        .await;
    Ok(Json(habits_response(&state).await))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<HabitsResponse> {
    state.manager.delete_habit(&id).await;
    Json(habits_response(&state).await)
}

pub async fn toggle_habit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ToggleRequest>,
) -> Json<HabitsResponse> {
    state.manager.toggle_completion(&id, payload.person).await;
    Json(habits_response(&state).await)
}

pub async fn reorder_habits(
    State(state): State<AppState>,
    Json(payload): Json<ReorderRequest>,
) -> Result<Json<HabitsResponse>, AppError> {
    let len = state.manager.snapshot().await.habits.len();
    if payload.from >= len || payload.to >= len {
        return Err(AppError::bad_request("reorder index out of range"));
    }

    state.manager.reorder_habits(payload.from, payload.to).await;
    Ok(Json(habits_response(&state).await))
}

pub async fn reset_habits(State(state): State<AppState>) -> Json<HabitsResponse> {
    state.manager.reset_daily().await;
    Json(habits_response(&state).await)
}

async fn habits_response(state: &AppState) -> HabitsResponse {
    let day = state.manager.snapshot().await;
    HabitsResponse {
        date: day.date,
        habits: day.habits,
        loading: state.manager.is_loading().await,
        online: state.manager.is_online(),
    }
}
