//! Route table for the gateway

use crate::{models::request::ApiResponse, AppState};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use super::images;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handle_health))
        .route("/api/v1/images/single", post(images::upload_single))
        .route("/api/v1/images/array", post(images::upload_array))
        .route("/api/v1/images/fields", post(images::upload_fields))
}

async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(serde_json::json!({
        "status": "healthy",
        "app": state.app_name,
        "version": state.version,
        "timestamp": chrono::Utc::now().timestamp(),
    })))
}
