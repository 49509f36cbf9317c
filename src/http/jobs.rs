use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::db::job::{JobDetail, JobInput, JobListItem, JobUpdate, JobWithCustomer};
use crate::http::error::ApiError;
use crate::http::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<JobListItem>>, ApiError> {
    let jobs = state
        .jobs()
        .list()
        .await
        .map_err(|e| ApiError::internal("Failed to fetch jobs", e))?;
    Ok(Json(jobs))
}

/// The only handler that distinguishes absence from error.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobDetail>, ApiError> {
    state
        .jobs()
        .get(id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch job", e))?
        .map(Json)
        .ok_or(ApiError::NotFound("Job not found"))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<JobInput>,
) -> Result<(StatusCode, Json<JobWithCustomer>), ApiError> {
    let job = state
        .jobs()
        .create(input)
        .await
        .map_err(|e| ApiError::internal("Failed to create job", e))?;
    Ok((StatusCode::CREATED, Json(job)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<JobUpdate>,
) -> Result<Json<JobWithCustomer>, ApiError> {
    state
        .jobs()
        .update(id, input)
        .await
        .map_err(|e| ApiError::internal("Failed to update job", e))?
        .map(Json)
        .ok_or(ApiError::Internal("Failed to update job"))
}
