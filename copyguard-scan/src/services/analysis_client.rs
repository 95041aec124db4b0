//! Media analysis client
//!
//! Audio and video scans delegate fingerprint computation to an external
//! analysis capability that reads the staged file from disk. A missing
//! hash (audio) or an empty hash list (video) means the capability found
//! no usable signal — a valid outcome, not an error.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

const DEFAULT_ANALYSIS_BASE_URL: &str = "http://127.0.0.1:9200";
const USER_AGENT: &str = "CopyGuard/0.1.0 (https://github.com/copyguard/copyguard)";
const RATE_LIMIT_MS: u64 = 200; // 5 requests per second toward the analysis service

/// Analysis capability errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Analysis service error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Serialize)]
struct AnalysisRequest<'a> {
    file_path: &'a str,
}

#[derive(Debug, Deserialize)]
struct AudioAnalysisResponse {
    #[serde(default)]
    fingerprint_hash: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoAnalysisResponse {
    #[serde(default)]
    fingerprint_hashes: Vec<String>,
}

/// Rate limiter for the analysis service
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Analysis rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Media analysis capability client
pub struct AnalysisClient {
    http_client: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
    base_url: String,
}

impl AnalysisClient {
    pub fn new() -> Result<Self, AnalysisError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter: Arc::new(RateLimiter::new(RATE_LIMIT_MS)),
            base_url: DEFAULT_ANALYSIS_BASE_URL.to_string(),
        })
    }

    /// Override the capability base URL (configuration and tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Compute an audio fingerprint for a staged file
    ///
    /// Returns `None` when the capability found no usable signal.
    pub async fn audio_fingerprint(&self, path: &Path) -> Result<Option<String>, AnalysisError> {
        let body: AudioAnalysisResponse = self.analyze("audio", path).await?;

        if body.fingerprint_hash.is_none() {
            tracing::info!(path = %path.display(), "Audio analysis found no usable signal");
        }

        Ok(body.fingerprint_hash)
    }

    /// Compute per-segment video fingerprints for a staged file
    ///
    /// Returns an empty list when the capability found no usable signal.
    pub async fn video_fingerprints(&self, path: &Path) -> Result<Vec<String>, AnalysisError> {
        let body: VideoAnalysisResponse = self.analyze("video", path).await?;

        if body.fingerprint_hashes.is_empty() {
            tracing::info!(path = %path.display(), "Video analysis found no usable signal");
        }

        Ok(body.fingerprint_hashes)
    }

    async fn analyze<T: serde::de::DeserializeOwned>(
        &self,
        kind: &str,
        path: &Path,
    ) -> Result<T, AnalysisError> {
        self.rate_limiter.wait().await;

        let file_path = path.to_string_lossy();
        let request = AnalysisRequest {
            file_path: file_path.as_ref(),
        };

        tracing::debug!(kind, path = %path.display(), "Requesting media analysis");

        let response = self
            .http_client
            .post(format!("{}/v1/analyze/{}", self.base_url, kind))
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Api(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| AnalysisError::Parse(e.to_string()))
    }
}
