use axum::Json;
use chrono::Utc;
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::http::error::ApiError;

// Placeholder credential store: a single hardcoded pair. The issued token
// is a prefix plus the current timestamp and is never verified by any
// other endpoint.
pub const ADMIN_ID: &str = "admin-id";
const ADMIN_EMAIL: &str = "admin@khscrm.com";
const ADMIN_PASSWORD: &str = "admin123";

static ADMIN_USER: Lazy<Value> = Lazy::new(|| {
    json!({
        "id": ADMIN_ID,
        "email": ADMIN_EMAIL,
        "name": "Admin User",
        "role": "OWNER"
    })
});

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login(Json(input): Json<LoginInput>) -> Result<Json<Value>, ApiError> {
    if input.email == ADMIN_EMAIL && input.password == ADMIN_PASSWORD {
        let now = Utc::now().timestamp_millis();
        Ok(Json(json!({
            "token": format!("mock-token-{now}"),
            "refreshToken": format!("mock-refresh-{now}"),
            "user": ADMIN_USER.clone(),
        })))
    } else {
        Err(ApiError::Unauthorized)
    }
}

pub async fn me() -> Json<Value> {
    Json(ADMIN_USER.clone())
}

pub async fn check() -> Json<Value> {
    Json(json!({ "authenticated": true }))
}
