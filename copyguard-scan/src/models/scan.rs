//! Scan request, outcome, and record types
//!
//! A scan progresses through a fixed sequence of phases:
//! validate → stage (audio/video only) → extract → evaluate → record.
//! Every invocation ends in exactly one `ScanRecord`, completed or failed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Kind of content a scan compares against the suspect page
///
/// Closed set: adding a kind is a compile-checked exhaustive match in the
/// orchestrator. `Image` exists so the API can name the kind it rejects
/// instead of failing deserialization with an opaque error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Audio,
    Video,
    /// Accepted on the wire, always rejected by the orchestrator
    Image,
}

impl ContentKind {
    /// Stable lowercase token used in database rows and query params
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Audio => "audio",
            ContentKind::Video => "video",
            ContentKind::Image => "image",
        }
    }

    /// Capitalized label for user-facing result messages
    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::Text => "Text",
            ContentKind::Audio => "Audio",
            ContentKind::Video => "Video",
            ContentKind::Image => "Image",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ContentKind::Text),
            "audio" => Ok(ContentKind::Audio),
            "video" => Ok(ContentKind::Video),
            "image" => Ok(ContentKind::Image),
            other => Err(format!("Unknown content kind: {}", other)),
        }
    }
}

/// One scan invocation as submitted by a caller
///
/// Transient: consumed by the orchestrator, never persisted directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    /// Owner of the resulting scan record
    pub user_id: Uuid,

    /// Suspect page to scan; must be an absolute http/https URL
    pub target_url: String,

    /// Kind of reference content supplied
    pub content_kind: ContentKind,

    /// Base64-encoded reference media (required for audio/video)
    #[serde(default)]
    pub media_base64: Option<String>,

    /// Free-text reference content (text scans only)
    #[serde(default)]
    pub reference_text: Option<String>,
}

/// Classification of one fingerprint comparison against the threshold
///
/// Invariant: `match_found == (round(match_score * 100) >= threshold_used)`
/// for every evaluator-produced outcome. Failure fallbacks use score 0 and
/// `match_found = false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub match_found: bool,
    /// Normalized similarity score in [0, 1]
    pub match_score: f64,
    /// Human-readable classification message
    pub result_message: String,
    /// Threshold percentage the score was compared against
    pub threshold_used: u8,
}

impl MatchOutcome {
    /// Outcome for a scan that produced no usable signal
    pub fn no_match(threshold_used: u8, message: impl Into<String>) -> Self {
        Self {
            match_found: false,
            match_score: 0.0,
            result_message: message.into(),
            threshold_used,
        }
    }
}

/// Result payload returned to callers in the uniform scan envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanData {
    pub match_found: bool,
    pub match_score: f64,
    pub result_message: String,
    pub threshold_used: u8,
    /// Transcript produced by a text scan, when one was generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

impl ScanData {
    /// Build from an evaluator outcome
    pub fn from_outcome(outcome: MatchOutcome, transcript: Option<String>) -> Self {
        Self {
            match_found: outcome.match_found,
            match_score: outcome.match_score,
            result_message: outcome.result_message,
            threshold_used: outcome.threshold_used,
            transcript,
        }
    }

    /// Fallback payload for failed scans (score 0, no match)
    pub fn failure(threshold_used: u8, message: impl Into<String>) -> Self {
        Self {
            match_found: false,
            match_score: 0.0,
            result_message: message.into(),
            threshold_used,
            transcript: None,
        }
    }
}

/// Uniform terminal result of `execute_scan`
///
/// Every failure mode is mapped into this shape; raw errors never reach
/// the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResponse {
    pub success: bool,
    pub data: ScanData,
    pub message: String,
}

/// Terminal status of a scan record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Completed,
    Failed,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Completed => "completed",
            ScanStatus::Failed => "failed",
        }
    }
}

impl FromStr for ScanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(ScanStatus::Completed),
            "failed" => Ok(ScanStatus::Failed),
            other => Err(format!("Unknown scan status: {}", other)),
        }
    }
}

/// Durable audit entry for one scan attempt
///
/// Insert-only: rows are never updated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub page_url: String,
    pub scan_type: ContentKind,
    pub status: ScanStatus,
    pub match_found: bool,
    /// Absent for failed scans
    pub match_score: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl ScanRecord {
    /// Record for a scan that ran to completion
    pub fn completed(
        user_id: Uuid,
        page_url: String,
        scan_type: ContentKind,
        outcome: &MatchOutcome,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            page_url,
            scan_type,
            status: ScanStatus::Completed,
            match_found: outcome.match_found,
            match_score: Some(outcome.match_score),
            created_at: Utc::now(),
        }
    }

    /// Record for a scan that failed before producing an outcome
    pub fn failed(user_id: Uuid, page_url: String, scan_type: ContentKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            page_url,
            scan_type,
            status: ScanStatus::Failed,
            match_found: false,
            match_score: None,
            created_at: Utc::now(),
        }
    }
}

/// Outcome filter for scan history queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeFilter {
    /// Only records with `match_found = true`
    Found,
    /// Only records with `match_found = false`
    NotFound,
}

impl FromStr for OutcomeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "found" => Ok(OutcomeFilter::Found),
            "not_found" => Ok(OutcomeFilter::NotFound),
            other => Err(format!("Unknown outcome filter: {}", other)),
        }
    }
}

/// Optional filters for per-user scan history
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanHistoryFilter {
    pub scan_type: Option<ContentKind>,
    pub outcome: Option<OutcomeFilter>,
}
