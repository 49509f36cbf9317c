use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::db::customer::{Customer, CustomerInput, CustomerUpdate, CustomerWithJobs};
use crate::http::error::ApiError;
use crate::http::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CustomerWithJobs>>, ApiError> {
    let customers = state
        .customers()
        .list_active()
        .await
        .map_err(|e| ApiError::internal("Failed to fetch customers", e))?;
    Ok(Json(customers))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CustomerInput>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let customer = state
        .customers()
        .create(input)
        .await
        .map_err(|e| ApiError::internal("Failed to create customer", e))?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CustomerUpdate>,
) -> Result<Json<Customer>, ApiError> {
    state
        .customers()
        .update(id, input)
        .await
        .map_err(|e| ApiError::internal("Failed to update customer", e))?
        .map(Json)
        .ok_or(ApiError::Internal("Failed to update customer"))
}

pub async fn archive(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let archived = state
        .customers()
        .archive(id)
        .await
        .map_err(|e| ApiError::internal("Failed to delete customer", e))?;
    if archived {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::Internal("Failed to delete customer"))
    }
}
