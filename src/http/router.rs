use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use crate::http::state::AppState;
use crate::http::{auth, customers, health, jobs, schedule, tools, workers};

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// The full route table. A configured frontend origin narrows CORS to that
/// origin with credentials; otherwise the API stays unrestricted.
pub fn router(state: AppState, frontend_url: Option<&str>) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/api/health", get(health::health))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/check", get(auth::check))
        .route("/api/customers", get(customers::list).post(customers::create))
        .route(
            "/api/customers/{id}",
            put(customers::update).delete(customers::archive),
        )
        .route("/api/jobs", get(jobs::list).post(jobs::create))
        .route("/api/jobs/{id}", get(jobs::get_one).put(jobs::update))
        .route("/api/workers", get(workers::list).post(workers::create))
        .route("/api/tools/categories", get(tools::categories))
        .route(
            "/api/khs-tools-sync",
            get(tools::sync_state).post(tools::sync_update),
        )
        .route("/api/schedule", get(schedule::list).post(schedule::create))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer(frontend_url))
        .with_state(state)
}

fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let origin = frontend_url
        .filter(|o| *o != "*")
        .and_then(|o| o.parse::<HeaderValue>().ok());
    match origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    }
}

async fn not_found(uri: Uri) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found", "path": uri.path() })),
    )
}
