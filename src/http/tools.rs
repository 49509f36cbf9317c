use axum::extract::State;
use axum::Json;

use crate::db::tools::{ToolCategory, ToolsSyncInput, ToolsSyncState};
use crate::http::auth::ADMIN_ID;
use crate::http::error::ApiError;
use crate::http::state::AppState;

pub async fn categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<ToolCategory>>, ApiError> {
    let tree = state
        .tools()
        .list_tree()
        .await
        .map_err(|e| ApiError::internal("Failed to fetch tool categories", e))?;
    Ok(Json(tree))
}

/// A never-written singleton reads as the default empty state.
pub async fn sync_state(State(state): State<AppState>) -> Result<Json<ToolsSyncState>, ApiError> {
    let sync = state
        .tools()
        .sync_get()
        .await
        .map_err(|e| ApiError::internal("Failed to fetch KHS tools sync", e))?;
    Ok(Json(sync.unwrap_or_default()))
}

pub async fn sync_update(
    State(state): State<AppState>,
    Json(input): Json<ToolsSyncInput>,
) -> Result<Json<ToolsSyncState>, ApiError> {
    let sync = state
        .tools()
        .sync_upsert(input, ADMIN_ID)
        .await
        .map_err(|e| ApiError::internal("Failed to update KHS tools sync", e))?;
    Ok(Json(sync))
}
