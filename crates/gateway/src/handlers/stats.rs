//! Aggregate statistics handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use zodiac_common::{db::MonthCount, errors::Result, timestamps::iso_timestamp};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub success: bool,
    pub total_readings: u64,
    pub by_month: Vec<MonthCount>,
    pub photos_taken: u64,
    pub timestamp: String,
}

/// Totals, per-month breakdown, and photo count
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let stats = state.readings.stats().await?;

    Ok(Json(StatsResponse {
        success: true,
        total_readings: stats.total_readings,
        by_month: stats.by_month,
        photos_taken: stats.photos_taken,
        timestamp: iso_timestamp(chrono::Utc::now()),
    }))
}
