//! HTTP request handlers for the case intake API.
//!
//! Implements the case CRUD endpoints and the health check using axum.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use firefly_domain::{Case, CaseId, CaseQuery, CaseStatus, CaseStore, CaseUpdate, UrgencyLevel};
use firefly_extractor::CaseExtractor;
use firefly_store::{SqliteStore, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Case store behind an async mutex (SQLite connections are not thread-safe)
    pub store: Arc<Mutex<SqliteStore>>,
    /// The shared extractor; stateless, so no lock needed
    pub extractor: Arc<CaseExtractor>,
}

/// Case intake request
#[derive(Debug, Deserialize)]
pub struct CreateCaseRequest {
    /// Origin channel ("facebook", "twitter", "line", "manual", ...)
    pub source: String,
    /// Link to the original post
    pub source_url: Option<String>,
    /// The untouched post text
    pub raw_content: String,
    /// Caller-supplied latitude
    pub latitude: Option<f64>,
    /// Caller-supplied longitude
    pub longitude: Option<f64>,
}

/// Partial case update request
#[derive(Debug, Deserialize)]
pub struct UpdateCaseRequest {
    /// New lifecycle status
    pub status: Option<String>,
    /// New assignee
    pub assigned_to: Option<String>,
    /// New operator notes
    pub notes: Option<String>,
}

/// List filter query string; empty values mean "no filter"
#[derive(Debug, Deserialize)]
pub struct ListCasesParams {
    /// Exact-match status filter
    pub status: Option<String>,
    /// Exact-match urgency filter
    pub urgency: Option<String>,
    /// Maximum rows to return
    pub limit: Option<String>,
}

/// A stored case as returned over the wire
#[derive(Debug, Serialize)]
pub struct CaseResponse {
    /// Case id as a UUID string
    pub id: String,
    /// Origin channel
    pub source: String,
    /// Link to the original post
    pub source_url: Option<String>,
    /// The untouched post text
    pub raw_content: String,
    /// Distinct phone numbers, first-match order
    pub extracted_phones: Vec<String>,
    /// First gazetteer hit, if any
    pub extracted_location: Option<String>,
    /// Caller-supplied latitude
    pub latitude: Option<f64>,
    /// Caller-supplied longitude
    pub longitude: Option<f64>,
    /// Derived description
    pub description: String,
    /// Derived urgency level
    pub urgency_level: String,
    /// Lifecycle status
    pub status: String,
    /// Assignee
    pub assigned_to: Option<String>,
    /// Operator notes
    pub notes: Option<String>,
    /// Creation time (milliseconds since Unix epoch)
    pub created_at: u64,
    /// Last modification time (milliseconds since Unix epoch)
    pub updated_at: u64,
}

impl From<Case> for CaseResponse {
    fn from(case: Case) -> Self {
        Self {
            id: case.id.to_string(),
            source: case.source,
            source_url: case.source_url,
            raw_content: case.raw_content,
            extracted_phones: case.extracted_phones,
            extracted_location: case.extracted_location,
            latitude: case.latitude,
            longitude: case.longitude,
            description: case.description,
            urgency_level: case.urgency.as_str().to_string(),
            status: case.status.as_str().to_string(),
            assigned_to: case.assigned_to,
            notes: case.notes,
            created_at: case.created_at,
            updated_at: case.updated_at,
        }
    }
}

/// Delete confirmation
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Human-readable confirmation
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall health status
    pub status: String,
    /// Total number of stored cases, when the store is reachable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_count: Option<u64>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Optional detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Request failed validation before extraction ran
    Validation(String),
    /// The id names no stored case
    NotFound,
    /// Storage failure
    Database(StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: msg,
                    message: None,
                },
            ),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: "Case not found".to_string(),
                    message: None,
                },
            ),
            AppError::Database(e) => {
                error!("Storage failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Database error".to_string(),
                        message: Some(e.to_string()),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Database(e)
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Parse a non-empty filter value, treating `""` as absent
fn parse_filter<T>(
    value: &Option<String>,
    parse: impl Fn(&str) -> Option<T>,
    what: &str,
) -> Result<Option<T>, AppError> {
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => parse(s)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("Unknown {}: {}", what, s))),
    }
}

/// POST /api/cases - Ingest a raw post and derive the structured fields
async fn create_case(
    State(state): State<AppState>,
    Json(request): Json<CreateCaseRequest>,
) -> Result<(StatusCode, Json<CaseResponse>), AppError> {
    if request.source.trim().is_empty() {
        return Err(AppError::Validation("source is required".to_string()));
    }
    if request.raw_content.trim().is_empty() {
        return Err(AppError::Validation("raw_content is required".to_string()));
    }

    let extraction = state.extractor.extract(&request.raw_content);

    let case = Case::new(
        CaseId::new(),
        request.source,
        request.source_url,
        request.raw_content,
        extraction.phones,
        extraction.location,
        extraction.description,
        extraction.urgency,
        request.latitude,
        request.longitude,
        now_ms(),
    );

    let mut store = state.store.lock().await;
    store.insert_case(case.clone())?;

    info!(id = %case.id, urgency = case.urgency.as_str(), "case ingested");

    Ok((StatusCode::CREATED, Json(case.into())))
}

/// GET /api/cases - List cases, newest first, with optional exact-match filters
async fn list_cases(
    State(state): State<AppState>,
    Query(params): Query<ListCasesParams>,
) -> Result<Json<Vec<CaseResponse>>, AppError> {
    let query = CaseQuery {
        status: parse_filter(&params.status, CaseStatus::parse, "status")?,
        urgency: parse_filter(&params.urgency, UrgencyLevel::parse, "urgency")?,
        limit: parse_filter(&params.limit, |s| s.parse::<usize>().ok(), "limit")?,
    };

    let store = state.store.lock().await;
    let cases = store.query_cases(&query)?;

    Ok(Json(cases.into_iter().map(CaseResponse::from).collect()))
}

/// GET /api/cases/:id - Fetch a single case
async fn get_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CaseResponse>, AppError> {
    let id = CaseId::from_string(&id).map_err(|_| AppError::NotFound)?;

    let store = state.store.lock().await;
    let case = store.get_case(id)?.ok_or(AppError::NotFound)?;

    Ok(Json(case.into()))
}

/// PUT /api/cases/:id - Partial update of the operator-mutable fields
async fn update_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCaseRequest>,
) -> Result<Json<CaseResponse>, AppError> {
    let id = CaseId::from_string(&id).map_err(|_| AppError::NotFound)?;

    let status = match request.status.as_deref() {
        None => None,
        Some(s) => Some(
            CaseStatus::parse(s)
                .ok_or_else(|| AppError::Validation(format!("Unknown status: {}", s)))?,
        ),
    };

    let update = CaseUpdate {
        status,
        assigned_to: request.assigned_to,
        notes: request.notes,
    };

    let mut store = state.store.lock().await;
    let case = store.update_case(id, &update)?.ok_or(AppError::NotFound)?;

    Ok(Json(case.into()))
}

/// DELETE /api/cases/:id - Remove a case
async fn delete_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = CaseId::from_string(&id).map_err(|_| AppError::NotFound)?;

    let mut store = state.store.lock().await;
    if !store.delete_case(id)? {
        return Err(AppError::NotFound);
    }

    Ok(Json(DeleteResponse {
        message: "Case deleted".to_string(),
    }))
}

/// GET /health - Liveness and store reachability
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.store.lock().await;

    match store.count_cases() {
        Ok(count) => Json(HealthResponse {
            status: "ok".to_string(),
            case_count: Some(count),
        }),
        Err(e) => {
            error!("Health check store failure: {}", e);
            Json(HealthResponse {
                status: "unhealthy".to_string(),
                case_count: None,
            })
        }
    }
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/api/cases", post(create_case).get(list_cases))
        .route(
            "/api/cases/:id",
            get(get_case).put(update_case).delete(delete_case),
        )
        .route("/health", get(health_check))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt; // for oneshot

    fn create_test_state() -> AppState {
        let store = SqliteStore::new(":memory:").expect("in-memory store");
        AppState {
            store: Arc::new(Mutex::new(store)),
            extractor: Arc::new(CaseExtractor::new()),
        }
    }

    fn post_case(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/cases")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Ingest one case and return its id
    async fn ingest(app: &AxumRouter, body: &str) -> String {
        let response = app.clone().oneshot(post_case(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        json["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_create_case_derives_fields() {
        let app = create_router(create_test_state());

        let response = app
            .oneshot(post_case(
                r#"{"source": "facebook",
                    "source_url": "https://facebook.com/post/1",
                    "raw_content": "ช่วยด้วย น้ำท่วมที่หาดใหญ่ มีเด็ก 2 คน โทร 081-234-5678",
                    "latitude": 7.0086,
                    "longitude": 100.4747}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;

        assert_eq!(json["source"], "facebook");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["urgency_level"], "high");
        assert_eq!(json["extracted_location"], "หาดใหญ่");
        assert_eq!(json["extracted_phones"][0], "081-234-5678");
        assert!(json["description"].as_str().unwrap().contains("เด็ก"));
        assert!(json["created_at"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_create_case_rejects_empty_fields() {
        let app = create_router(create_test_state());

        let response = app
            .clone()
            .oneshot(post_case(r#"{"source": "", "raw_content": "น้ำท่วม"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(post_case(r#"{"source": "manual", "raw_content": "  "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_cases_newest_first() {
        let app = create_router(create_test_state());

        ingest(&app, r#"{"source": "manual", "raw_content": "เคสแรก"}"#).await;
        let second = ingest(&app, r#"{"source": "manual", "raw_content": "เคสที่สอง"}"#).await;

        let response = app
            .oneshot(Request::builder().uri("/api/cases").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let cases = json.as_array().unwrap();

        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0]["id"], second.as_str());
    }

    #[tokio::test]
    async fn test_list_cases_empty_filters_are_unfiltered() {
        let app = create_router(create_test_state());
        ingest(&app, r#"{"source": "manual", "raw_content": "ขอความช่วยเหลือ"}"#).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/cases?status=&urgency=")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_cases_urgency_filter() {
        let app = create_router(create_test_state());

        ingest(&app, r#"{"source": "manual", "raw_content": "ฉุกเฉิน มีคนหมดสติ"}"#).await;
        ingest(&app, r#"{"source": "manual", "raw_content": "สถานการณ์ปกติ"}"#).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/cases?urgency=critical")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let cases = json.as_array().unwrap();

        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0]["urgency_level"], "critical");
    }

    #[tokio::test]
    async fn test_list_cases_unknown_filter_value() {
        let app = create_router(create_test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/cases?status=done")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_case() {
        let app = create_router(create_test_state());
        let id = ingest(&app, r#"{"source": "line", "raw_content": "ต้องการอาหาร"}"#).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/cases/{}", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["id"], id.as_str());
        assert_eq!(json["source"], "line");
    }

    #[tokio::test]
    async fn test_get_case_not_found() {
        let app = create_router(create_test_state());

        for uri in [
            "/api/cases/00000000-0000-7000-8000-000000000000",
            "/api/cases/not-a-uuid",
        ] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            let json = body_json(response).await;
            assert_eq!(json["error"], "Case not found");
        }
    }

    #[tokio::test]
    async fn test_update_case() {
        let app = create_router(create_test_state());
        let id = ingest(&app, r#"{"source": "manual", "raw_content": "ช่วยด้วย"}"#).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/api/cases/{}", id))
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"status": "assigned", "assigned_to": "ทีมกู้ภัย A"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;

        assert_eq!(json["status"], "assigned");
        assert_eq!(json["assigned_to"], "ทีมกู้ภัย A");
        // Derived fields survive the update
        assert_eq!(json["urgency_level"], "high");
    }

    #[tokio::test]
    async fn test_update_case_invalid_status() {
        let app = create_router(create_test_state());
        let id = ingest(&app, r#"{"source": "manual", "raw_content": "ช่วยด้วย"}"#).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/api/cases/{}", id))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"status": "done"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_case_not_found() {
        let app = create_router(create_test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/cases/00000000-0000-7000-8000-000000000000")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"status": "assigned"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_case() {
        let app = create_router(create_test_state());
        let id = ingest(&app, r#"{"source": "manual", "raw_content": "เคสทดสอบ"}"#).await;

        let delete = |id: String| {
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/cases/{}", id))
                .body(Body::empty())
                .unwrap()
        };

        let response = app.clone().oneshot(delete(id.clone())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Second delete finds nothing
        let response = app.oneshot(delete(id)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(create_test_state());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["case_count"], 0);
    }
}
