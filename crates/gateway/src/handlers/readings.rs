//! Reading submission and listing handlers

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};

use crate::AppState;
use zodiac_common::{
    db::models::Reading,
    errors::{AppError, Result},
    timestamps::iso_stored_timestamp,
    ReadingSubmission,
};

/// Response after saving a reading
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReadingResponse {
    pub success: bool,
    pub record_id: i32,
    pub created_at: String,
    pub message: &'static str,
}

/// Query string for the readings listing
#[derive(Debug, Deserialize)]
pub struct ReadingsQuery {
    pub limit: Option<u64>,
}

/// Response for the readings listing
#[derive(Serialize)]
pub struct ReadingsResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<Reading>,
}

/// Save one reading submission
pub async fn save_reading(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ReadingSubmission>, JsonRejection>,
) -> Result<Json<SaveReadingResponse>> {
    let Json(submission) = payload.map_err(|rejection| AppError::InvalidFormat {
        message: rejection.body_text(),
    })?;

    let saved = state.readings.save(submission).await?;

    Ok(Json(SaveReadingResponse {
        success: true,
        record_id: saved.id,
        created_at: iso_stored_timestamp(saved.created_at),
        message: "Zodiac reading saved successfully!",
    }))
}

/// List the most recent readings
pub async fn list_readings(
    State(state): State<AppState>,
    query: std::result::Result<Query<ReadingsQuery>, QueryRejection>,
) -> Result<Json<ReadingsResponse>> {
    let Query(query) = query.map_err(|rejection| AppError::InvalidFormat {
        message: rejection.body_text(),
    })?;

    let data = state.readings.recent(query.limit).await?;

    Ok(Json(ReadingsResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{app, get, post_json, send};
    use axum::{body::Body, http::Request, http::StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_save_reading_returns_record_id() {
        let (app, service) = app();
        let (status, body) = send(
            &app,
            post_json(
                "/api/save-reading",
                json!({
                    "session_id": "sess-1",
                    "birth_month": 8,
                    "zodiac_sign": "Leo",
                    "spirit_animal": "Lion",
                    "spirit_animal_emoji": "🦁",
                    "has_photo": true,
                    "timestamp": "2025-08-01T10:00:00Z"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["recordId"], 1);
        assert!(body["createdAt"].is_string());

        let rows = service.recent(None).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].author.as_deref(), Some("A.A. Milne"));
        assert_eq!(rows[0].device_type.as_deref(), Some("Unknown"));
    }

    #[tokio::test]
    async fn test_duplicate_session_is_bad_request() {
        let (app, service) = app();
        let payload = json!({ "session_id": "dup", "birth_month": 2 });

        let (first, _) = send(&app, post_json("/api/save-reading", payload.clone())).await;
        let (second, body) = send(&app, post_json("/api/save-reading", payload)).await;

        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "This reading has already been saved");
        assert_eq!(service.stats().await.unwrap().total_readings, 1);
    }

    #[tokio::test]
    async fn test_missing_fields_are_bad_request() {
        let (app, service) = app();
        let (status, body) = send(
            &app,
            post_json("/api/save-reading", json!({ "birth_month": 4 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MISSING_FIELD");
        assert_eq!(
            body["error"],
            "Missing required fields: session_id and birth_month"
        );
        assert_eq!(service.stats().await.unwrap().total_readings, 0);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let (app, _) = app();
        let request = Request::builder()
            .method("POST")
            .uri("/api/save-reading")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_FORMAT");
    }

    #[tokio::test]
    async fn test_browser_is_truncated() {
        let (app, service) = app();
        send(
            &app,
            post_json(
                "/api/save-reading",
                json!({ "session_id": "ua", "birth_month": 13, "browser": "x".repeat(250) }),
            ),
        )
        .await;

        let rows = service.recent(None).await.unwrap();
        assert_eq!(rows[0].browser.as_ref().map(|b| b.len()), Some(100));
        assert_eq!(rows[0].author.as_deref(), Some("Henry David Thoreau"));
    }

    #[tokio::test]
    async fn test_list_readings_newest_first_with_limit() {
        let (app, _) = app();
        for i in 0..3 {
            send(
                &app,
                post_json(
                    "/api/save-reading",
                    json!({ "session_id": format!("s{}", i), "birth_month": 1 }),
                ),
            )
            .await;
        }

        let (status, body) = send(&app, get("/api/readings?limit=2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 2);
        assert_eq!(body["data"][0]["session_id"], "s2");
        assert_eq!(body["data"][1]["session_id"], "s1");

        let (_, body) = send(&app, get("/api/readings")).await;
        assert_eq!(body["count"], 3);
    }

    #[tokio::test]
    async fn test_invalid_limit_is_bad_request() {
        let (app, _) = app();
        let (status, body) = send(&app, get("/api/readings?limit=-5")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_FORMAT");
    }

    #[tokio::test]
    async fn test_listing_renders_created_at_like_save_response() {
        let (app, _) = app();
        let (_, saved) = send(
            &app,
            post_json("/api/save-reading", json!({ "session_id": "ts", "birth_month": 9 })),
        )
        .await;

        let (_, listed) = send(&app, get("/api/readings")).await;
        let created_at = listed["data"][0]["created_at"].as_str().unwrap();

        assert!(created_at.ends_with('Z'));
        assert_eq!(listed["data"][0]["created_at"], saved["createdAt"]);
    }
}
