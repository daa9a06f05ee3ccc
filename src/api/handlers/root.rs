use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "DailyReel API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Daily video habit tracker with streaks, badges and cash rewards",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "auth": "/auth",
            "api": "/api"
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339()
        })),
    )
}
