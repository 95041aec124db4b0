//! Settings API endpoint
//!
//! Read and update the match threshold used by subsequent scans. Updates
//! never affect a scan already in flight — the orchestrator reads the
//! threshold once at scan start.

use crate::{db, ApiError, ApiResult, AppState};
use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Response payload for reading the threshold
#[derive(Debug, Serialize)]
pub struct GetThresholdResponse {
    /// Current match threshold percentage
    pub match_threshold: u8,
}

/// Request payload for updating the threshold
#[derive(Debug, Deserialize)]
pub struct SetThresholdRequest {
    /// New match threshold percentage, 0..=100
    pub match_threshold: u32,
}

/// Response payload for updating the threshold
#[derive(Debug, Serialize)]
pub struct SetThresholdResponse {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable status message
    pub message: String,
}

/// GET /api/settings/match_threshold handler
pub async fn get_match_threshold(State(state): State<AppState>) -> Json<GetThresholdResponse> {
    let match_threshold = db::settings::get_match_threshold(&state.db).await;
    Json(GetThresholdResponse { match_threshold })
}

/// POST /api/settings/match_threshold handler
///
/// **Request:** `{"match_threshold": 90}`
/// **Response:** `{"success": true, "message": "..."}`
///
/// **Errors:**
/// - 400 Bad Request: value outside 0..=100
/// - 500 Internal Server Error: database write failure
pub async fn set_match_threshold(
    State(state): State<AppState>,
    Json(payload): Json<SetThresholdRequest>,
) -> ApiResult<Json<SetThresholdResponse>> {
    if payload.match_threshold > 100 {
        return Err(ApiError::BadRequest(
            "Match threshold must be between 0 and 100".to_string(),
        ));
    }

    db::settings::set_match_threshold(&state.db, payload.match_threshold as u8)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to save match threshold: {}", e)))?;

    info!(
        match_threshold = payload.match_threshold,
        "Match threshold updated"
    );

    Ok(Json(SetThresholdResponse {
        success: true,
        message: format!("Match threshold set to {}%", payload.match_threshold),
    }))
}

/// Build settings routes
pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/settings/match_threshold",
            get(get_match_threshold).post(set_match_threshold),
        )
}
