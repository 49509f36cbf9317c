use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::db::schedule::{ScheduleEvent, ScheduleEventInput, ScheduleEventWithCustomer};
use crate::http::error::ApiError;
use crate::http::state::AppState;

pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<ScheduleEventWithCustomer>>, ApiError> {
    let events = state
        .schedule()
        .list()
        .await
        .map_err(|e| ApiError::internal("Failed to fetch schedule events", e))?;
    Ok(Json(events))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<ScheduleEventInput>,
) -> Result<(StatusCode, Json<ScheduleEvent>), ApiError> {
    let event = state
        .schedule()
        .create(input)
        .await
        .map_err(|e| ApiError::internal("Failed to create schedule event", e))?;
    Ok((StatusCode::CREATED, Json(event)))
}
