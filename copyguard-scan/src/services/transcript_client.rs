//! Transcript extraction client
//!
//! Text scans delegate page-content extraction to an external transcript
//! capability: request keyed by the suspect URL, response carrying the
//! extracted transcript. An empty transcript is a valid "no signal"
//! response, not an error.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_TRANSCRIPT_BASE_URL: &str = "http://127.0.0.1:9100";
const USER_AGENT: &str = "CopyGuard/0.1.0 (https://github.com/copyguard/copyguard)";

/// Transcript capability errors
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Transcript service error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Serialize)]
struct TranscriptRequest<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference_text: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    #[serde(default)]
    transcript: String,
}

/// Transcript capability client
pub struct TranscriptClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl TranscriptClient {
    pub fn new() -> Result<Self, TranscriptError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TranscriptError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: DEFAULT_TRANSCRIPT_BASE_URL.to_string(),
        })
    }

    /// Override the capability base URL (configuration and tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Extract a transcript of the suspect page's content
    ///
    /// Returns the transcript string; empty when the capability found no
    /// usable text on the page.
    pub async fn extract(
        &self,
        url: &str,
        reference_text: Option<&str>,
    ) -> Result<String, TranscriptError> {
        let request = TranscriptRequest {
            url,
            reference_text,
        };

        tracing::debug!(target_url = url, "Requesting transcript extraction");

        let response = self
            .http_client
            .post(format!("{}/v1/transcript", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| TranscriptError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TranscriptError::Api(status.as_u16(), error_text));
        }

        let body: TranscriptResponse = response
            .json()
            .await
            .map_err(|e| TranscriptError::Parse(e.to_string()))?;

        tracing::debug!(
            target_url = url,
            transcript_chars = body.transcript.len(),
            "Transcript extraction complete"
        );

        Ok(body.transcript)
    }
}
