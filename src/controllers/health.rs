use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::infrastructure::ffmpeg::Encoder;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Ready once the encoder binary can be started.
pub async fn health_ready(State(encoder): State<Arc<dyn Encoder>>) -> impl IntoResponse {
    if encoder.is_available().await {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "encoder": "available"
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "encoder": "unavailable"
            })),
        )
    }
}
