//! Health check handler

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::AppState;
use zodiac_common::timestamps::iso_timestamp;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub message: String,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct UnhealthyResponse {
    pub status: &'static str,
    pub error: String,
}

/// Report whether the reading store answers a ping
pub async fn health(State(state): State<AppState>) -> Response {
    let backend = state.readings.store().backend_name();

    match state.readings.ping().await {
        Ok(()) => Json(HealthResponse {
            status: "healthy",
            database: "connected",
            message: format!("Reading store ({}) is connected", backend),
            timestamp: iso_timestamp(chrono::Utc::now()),
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, backend, "Health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(UnhealthyResponse {
                    status: "unhealthy",
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
