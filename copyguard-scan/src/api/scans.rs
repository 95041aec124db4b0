//! Scan execution and history endpoints
//!
//! `POST /api/scan` runs the pipeline and always answers 200 with the
//! uniform result envelope — pipeline failures are `success = false`, not
//! HTTP errors. `GET /api/scans` serves per-user history, newest first.

use crate::models::{ScanHistoryFilter, ScanRecord, ScanRequest, ScanResponse};
use crate::{db, ApiError, ApiResult, AppState};
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// POST /api/scan handler
///
/// **Request:** `ScanRequest` JSON
/// **Response:** `{"success": bool, "data": {...}, "message": "..."}`
pub async fn execute_scan(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> Json<ScanResponse> {
    Json(state.orchestrator.execute_scan(request).await)
}

/// Query parameters for scan history
#[derive(Debug, Deserialize)]
pub struct ScanHistoryQuery {
    pub user_id: Uuid,
    /// Filter by scan type: "text" | "audio" | "video"
    pub scan_type: Option<String>,
    /// Filter by outcome: "found" | "not_found"
    pub outcome: Option<String>,
    /// Maximum records to return; unbounded when absent
    pub limit: Option<i64>,
}

/// Scan history response
#[derive(Debug, Serialize)]
pub struct ScanHistoryResponse {
    pub scans: Vec<ScanRecord>,
}

/// GET /api/scans handler
///
/// **Errors:**
/// - 400 Bad Request: unknown `scan_type` or `outcome` value
pub async fn list_scans(
    State(state): State<AppState>,
    Query(query): Query<ScanHistoryQuery>,
) -> ApiResult<Json<ScanHistoryResponse>> {
    let mut filter = ScanHistoryFilter::default();

    if let Some(scan_type) = &query.scan_type {
        filter.scan_type = Some(scan_type.parse().map_err(ApiError::BadRequest)?);
    }
    if let Some(outcome) = &query.outcome {
        filter.outcome = Some(outcome.parse().map_err(ApiError::BadRequest)?);
    }

    let scans = db::scans::list_scans_for_user(&state.db, query.user_id, filter, query.limit)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to load scan history: {}", e)))?;

    Ok(Json(ScanHistoryResponse { scans }))
}

/// Build scan routes
pub fn scan_routes() -> Router<AppState> {
    Router::new()
        .route("/api/scan", post(execute_scan))
        .route("/api/scans", get(list_scans))
}
