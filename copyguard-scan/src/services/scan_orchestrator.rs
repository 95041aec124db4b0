//! Scan orchestrator
//!
//! Public entry point of the scan engine. Sequences one scan through its
//! phases — validate → stage (audio/video only) → extract → evaluate →
//! record — and maps every failure mode into the uniform result envelope.
//!
//! Recording is unconditional: each invocation writes exactly one scan
//! record, completed or failed, as its final step. Staged media is
//! dropped (and deleted) on every path out of the extraction phase.
//! Invocations are stateless across calls; concurrent scans share only
//! the settings read and the append-only record insert.

use crate::db;
use crate::models::{ContentKind, MatchOutcome, ScanData, ScanRecord, ScanRequest, ScanResponse};
use crate::services::analysis_client::{AnalysisClient, AnalysisError};
use crate::services::match_evaluator::{
    evaluate, presence_score, transcript_score, AUDIO_NO_MATCH_MESSAGE, NO_TRANSCRIPT_MESSAGE,
    VIDEO_NO_MATCH_MESSAGE,
};
use crate::services::media_stager::{MediaStager, StagingError};
use crate::services::transcript_client::{TranscriptClient, TranscriptError};
use sqlx::SqlitePool;
use std::path::PathBuf;
use thiserror::Error;

/// Scan pipeline errors
///
/// All variants are caught inside `execute_scan` and converted into the
/// `success = false` envelope; none propagate to callers.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Staging failed: {0}")]
    Staging(#[from] StagingError),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Content kind '{0}' is not supported")]
    UnsupportedKind(ContentKind),
}

impl From<TranscriptError> for ScanError {
    fn from(e: TranscriptError) -> Self {
        ScanError::Extraction(e.to_string())
    }
}

impl From<AnalysisError> for ScanError {
    fn from(e: AnalysisError) -> Self {
        ScanError::Extraction(e.to_string())
    }
}

/// Scan orchestrator service
pub struct ScanOrchestrator {
    db: SqlitePool,
    stager: MediaStager,
    transcript_client: TranscriptClient,
    analysis_client: AnalysisClient,
}

impl ScanOrchestrator {
    /// Create a new orchestrator
    ///
    /// # Arguments
    /// * `db` - Database connection pool
    /// * `staging_dir` - Directory for transient staged media
    /// * `transcript_client` - Text extraction capability
    /// * `analysis_client` - Audio/video analysis capability
    pub fn new(
        db: SqlitePool,
        staging_dir: PathBuf,
        transcript_client: TranscriptClient,
        analysis_client: AnalysisClient,
    ) -> Self {
        Self {
            db,
            stager: MediaStager::new(staging_dir),
            transcript_client,
            analysis_client,
        }
    }

    /// Execute one scan to completion
    ///
    /// The threshold is resolved once at scan start; changes apply to the
    /// next scan only. The caller always receives a structured response —
    /// upstream failures become `success = false` with a readable message.
    pub async fn execute_scan(&self, request: ScanRequest) -> ScanResponse {
        let threshold = db::settings::get_match_threshold(&self.db).await;

        tracing::info!(
            user_id = %request.user_id,
            target_url = %request.target_url,
            kind = %request.content_kind,
            threshold,
            "Starting scan"
        );

        match self.run_pipeline(&request, threshold).await {
            Ok((outcome, transcript)) => {
                let record = ScanRecord::completed(
                    request.user_id,
                    request.target_url.clone(),
                    request.content_kind,
                    &outcome,
                );
                if let Err(e) = db::scans::insert_scan(&self.db, &record).await {
                    tracing::error!(scan_id = %record.id, "Failed to record scan: {}", e);
                    let message = format!("Failed to record scan: {}", e);
                    return ScanResponse {
                        success: false,
                        data: ScanData::failure(threshold, message.clone()),
                        message,
                    };
                }

                tracing::info!(
                    scan_id = %record.id,
                    match_found = outcome.match_found,
                    match_score = outcome.match_score,
                    "Scan completed"
                );

                let message = outcome.result_message.clone();
                ScanResponse {
                    success: true,
                    data: ScanData::from_outcome(outcome, transcript),
                    message,
                }
            }
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(
                    user_id = %request.user_id,
                    target_url = %request.target_url,
                    "Scan failed: {}",
                    message
                );

                let record = ScanRecord::failed(
                    request.user_id,
                    request.target_url.clone(),
                    request.content_kind,
                );
                if let Err(e) = db::scans::insert_scan(&self.db, &record).await {
                    tracing::error!(scan_id = %record.id, "Failed to record failed scan: {}", e);
                }

                ScanResponse {
                    success: false,
                    data: ScanData::failure(threshold, message.clone()),
                    message,
                }
            }
        }
    }

    /// Dispatch on content kind
    ///
    /// Closed match: adding a kind fails compilation until handled here.
    async fn run_pipeline(
        &self,
        request: &ScanRequest,
        threshold: u8,
    ) -> Result<(MatchOutcome, Option<String>), ScanError> {
        validate_target_url(&request.target_url)?;

        match request.content_kind {
            ContentKind::Text => self.scan_text(request, threshold).await,
            ContentKind::Audio => self.scan_audio(request, threshold).await.map(|o| (o, None)),
            ContentKind::Video => self.scan_video(request, threshold).await.map(|o| (o, None)),
            // Rejected before staging or extraction ever run
            ContentKind::Image => Err(ScanError::UnsupportedKind(ContentKind::Image)),
        }
    }

    /// Text scans call the transcript capability directly with the URL
    async fn scan_text(
        &self,
        request: &ScanRequest,
        threshold: u8,
    ) -> Result<(MatchOutcome, Option<String>), ScanError> {
        let transcript = self
            .transcript_client
            .extract(&request.target_url, request.reference_text.as_deref())
            .await?;

        if transcript.trim().is_empty() {
            return Ok((MatchOutcome::no_match(threshold, NO_TRANSCRIPT_MESSAGE), None));
        }

        let score = transcript_score(true);
        Ok((evaluate(ContentKind::Text, score, threshold), Some(transcript)))
    }

    async fn scan_audio(
        &self,
        request: &ScanRequest,
        threshold: u8,
    ) -> Result<MatchOutcome, ScanError> {
        let payload = request.media_base64.as_deref().ok_or_else(|| {
            ScanError::Validation("Audio scan requires a media payload".to_string())
        })?;

        let staged = self.stager.stage(payload, ContentKind::Audio)?;
        // `staged` drops at the end of this scope — the file is gone on
        // the error path of the capability call as well
        let hash = self.analysis_client.audio_fingerprint(staged.path()).await?;

        match hash {
            Some(_) => Ok(evaluate(ContentKind::Audio, presence_score(true), threshold)),
            None => Ok(MatchOutcome::no_match(threshold, AUDIO_NO_MATCH_MESSAGE)),
        }
    }

    async fn scan_video(
        &self,
        request: &ScanRequest,
        threshold: u8,
    ) -> Result<MatchOutcome, ScanError> {
        let payload = request.media_base64.as_deref().ok_or_else(|| {
            ScanError::Validation("Video scan requires a media payload".to_string())
        })?;

        let staged = self.stager.stage(payload, ContentKind::Video)?;
        let hashes = self.analysis_client.video_fingerprints(staged.path()).await?;

        if hashes.is_empty() {
            Ok(MatchOutcome::no_match(threshold, VIDEO_NO_MATCH_MESSAGE))
        } else {
            Ok(evaluate(ContentKind::Video, presence_score(true), threshold))
        }
    }
}

/// Reject malformed or non-http(s) target URLs before any staging
fn validate_target_url(url: &str) -> Result<(), ScanError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| ScanError::Validation(format!("Invalid target URL: {}", e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ScanError::Validation(format!(
            "Unsupported URL scheme: {}",
            parsed.scheme()
        )));
    }

    Ok(())
}
