//! Single-invocation save handler
//!
//! Accepts a serverless-style `{httpMethod, body}` event and produces a
//! `{statusCode, headers, body}` response. Only POST saves; OPTIONS answers
//! the CORS preflight.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};
use zodiac_common::{
    config::DatabaseConfig,
    db,
    errors::{AppError, ErrorResponse},
    timestamps::iso_stored_timestamp,
    ReadingService, ReadingSubmission,
};

const CORS_HEADERS: [(&str, &str); 4] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Headers", "Content-Type"),
    ("Access-Control-Allow-Methods", "POST, OPTIONS"),
    ("Content-Type", "application/json"),
];

/// Incoming function event
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEvent {
    pub http_method: String,
    #[serde(default)]
    pub body: Option<String>,
}

/// Outgoing function response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub headers: BTreeMap<&'static str, &'static str>,
    pub body: String,
}

impl FunctionResponse {
    fn new(status_code: u16, body: String) -> Self {
        Self {
            status_code,
            headers: CORS_HEADERS.into_iter().collect(),
            body,
        }
    }

    fn json<T: Serialize>(status_code: u16, body: &T) -> Self {
        Self::new(status_code, serde_json::to_string(body).unwrap_or_default())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SavedBody {
    success: bool,
    record_id: i32,
    created_at: String,
    message: &'static str,
}

#[derive(Serialize)]
struct FailureBody {
    #[serde(flatten)]
    error: ErrorResponse,
    details: &'static str,
}

#[derive(Serialize)]
struct MethodNotAllowed {
    error: &'static str,
}

enum Route {
    Preflight,
    Save,
    NotAllowed,
}

fn route(method: &str) -> Route {
    if method.eq_ignore_ascii_case("OPTIONS") {
        Route::Preflight
    } else if method.eq_ignore_ascii_case("POST") {
        Route::Save
    } else {
        Route::NotAllowed
    }
}

/// Handle one event, opening and draining a pool around the save
pub async fn handle(event: FunctionEvent, config: &DatabaseConfig) -> FunctionResponse {
    match route(&event.http_method) {
        Route::Preflight => return FunctionResponse::new(200, String::new()),
        Route::NotAllowed => return not_allowed(&event.http_method),
        Route::Save => {}
    }

    let store = match db::open_store(config).await {
        Ok(store) => store,
        Err(e) => return failure(e),
    };

    let response = handle_with(event, &ReadingService::new(store.clone())).await;

    if let Err(e) = store.close().await {
        warn!(error = %e, "Failed to close reading store");
    }

    response
}

/// Handle one event against an already open service
pub async fn handle_with(event: FunctionEvent, service: &ReadingService) -> FunctionResponse {
    match route(&event.http_method) {
        Route::Preflight => FunctionResponse::new(200, String::new()),
        Route::NotAllowed => not_allowed(&event.http_method),
        Route::Save => match save(event.body, service).await {
            Ok(response) => response,
            Err(e) => failure(e),
        },
    }
}

async fn save(body: Option<String>, service: &ReadingService) -> Result<FunctionResponse, AppError> {
    let body = body.ok_or_else(|| AppError::InvalidFormat {
        message: "request body is empty".to_string(),
    })?;

    let submission: ReadingSubmission =
        serde_json::from_str(&body).map_err(|e| AppError::InvalidFormat {
            message: e.to_string(),
        })?;

    let saved = service.save(submission).await?;
    info!(record_id = saved.id, "Function saved reading");

    Ok(FunctionResponse::json(
        200,
        &SavedBody {
            success: true,
            record_id: saved.id,
            created_at: iso_stored_timestamp(saved.created_at),
            message: "Data saved to the reading store successfully!",
        },
    ))
}

fn not_allowed(method: &str) -> FunctionResponse {
    warn!(method, "Method not allowed");
    FunctionResponse::json(405, &MethodNotAllowed { error: "Method not allowed" })
}

fn failure(error: AppError) -> FunctionResponse {
    error.log();
    FunctionResponse::json(
        error.status_code().as_u16(),
        &FailureBody {
            error: error.to_body(),
            details: "Failed to save reading",
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tokio_test::assert_ok;
    use zodiac_common::config::MEMORY_DATABASE_URL;
    use zodiac_common::db::MemoryReadingStore;

    fn service() -> ReadingService {
        ReadingService::new(Arc::new(MemoryReadingStore::new()))
    }

    fn post(body: Value) -> FunctionEvent {
        FunctionEvent {
            http_method: "POST".to_string(),
            body: Some(body.to_string()),
        }
    }

    fn body(response: &FunctionResponse) -> Value {
        serde_json::from_str(&response.body).unwrap()
    }

    #[tokio::test]
    async fn test_post_saves_reading() {
        let service = service();
        let response = handle_with(post(json!({ "session_id": "fn-1", "birth_month": 10 })), &service).await;

        assert_eq!(response.status_code, 200);
        assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
        let body = body(&response);
        assert_eq!(body["success"], true);
        assert_eq!(body["recordId"], 1);

        let rows = service.recent(None).await.unwrap();
        assert_eq!(rows[0].author.as_deref(), Some("Eleanor Roosevelt"));
    }

    #[tokio::test]
    async fn test_duplicate_is_client_error() {
        let service = service();
        let event = post(json!({ "session_id": "fn-dup", "birth_month": 3 }));

        handle_with(event.clone(), &service).await;
        let response = handle_with(event, &service).await;

        assert_eq!(response.status_code, 400);
        let body = body(&response);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "This reading has already been saved");
        assert_eq!(body["details"], "Failed to save reading");
    }

    #[tokio::test]
    async fn test_preflight_and_wrong_method() {
        let service = service();

        let preflight = FunctionEvent {
            http_method: "OPTIONS".to_string(),
            body: None,
        };
        let response = handle_with(preflight, &service).await;
        assert_eq!(response.status_code, 200);
        assert!(response.body.is_empty());

        let get = FunctionEvent {
            http_method: "GET".to_string(),
            body: None,
        };
        let response = handle_with(get, &service).await;
        assert_eq!(response.status_code, 405);
        assert_eq!(body(&response)["error"], "Method not allowed");
    }

    #[tokio::test]
    async fn test_bad_bodies_are_rejected() {
        let service = service();

        let missing = FunctionEvent {
            http_method: "POST".to_string(),
            body: None,
        };
        assert_eq!(handle_with(missing, &service).await.status_code, 400);

        let malformed = FunctionEvent {
            http_method: "POST".to_string(),
            body: Some("{".to_string()),
        };
        assert_eq!(handle_with(malformed, &service).await.status_code, 400);

        let incomplete = post(json!({ "session_id": "only-session" }));
        assert_eq!(handle_with(incomplete, &service).await.status_code, 400);

        assert_eq!(service.stats().await.unwrap().total_readings, 0);
    }

    #[tokio::test]
    async fn test_handle_opens_configured_store() {
        let config = DatabaseConfig::with_url(MEMORY_DATABASE_URL);
        let response = handle(post(json!({ "session_id": "fn-mem", "birth_month": 6 })), &config).await;

        assert_eq!(response.status_code, 200);
    }

    #[test]
    fn test_event_parses_camel_case() {
        let event: FunctionEvent = assert_ok!(serde_json::from_str(
            r#"{"httpMethod":"POST","body":"{}","path":"/x"}"#
        ));
        assert_eq!(event.http_method, "POST");
        assert_eq!(event.body.as_deref(), Some("{}"));
    }
}
