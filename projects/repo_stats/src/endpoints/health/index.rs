use axum::{response::IntoResponse, Json};

/// Axum handler: GET /health
pub async fn handler() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Server running OK." }))
}
