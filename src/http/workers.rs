use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::db::worker::{Worker, WorkerInput};
use crate::http::error::ApiError;
use crate::http::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Worker>>, ApiError> {
    let workers = state
        .workers()
        .list()
        .await
        .map_err(|e| ApiError::internal("Failed to fetch workers", e))?;
    Ok(Json(workers))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<WorkerInput>,
) -> Result<(StatusCode, Json<Worker>), ApiError> {
    let worker = state
        .workers()
        .create(input)
        .await
        .map_err(|e| ApiError::internal("Failed to create worker", e))?;
    Ok((StatusCode::CREATED, Json(worker)))
}
