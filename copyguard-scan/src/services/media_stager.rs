//! Media staging service
//!
//! Decodes uploaded reference media and writes it to the staging directory
//! so the external analysis capability can read it from disk. The returned
//! `StagedMedia` guard deletes the file when dropped, which covers success,
//! handled failure, and unwinding alike.

use crate::models::ContentKind;
use base64::{engine::general_purpose, Engine as _};
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Staging errors (fatal to the enclosing scan, no retry)
#[derive(Debug, Error)]
pub enum StagingError {
    #[error("Failed to decode media payload: {0}")]
    Decode(String),

    #[error("Failed to write staged media: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes uploaded media into the staging directory
pub struct MediaStager {
    staging_dir: PathBuf,
}

impl MediaStager {
    pub fn new(staging_dir: PathBuf) -> Self {
        Self { staging_dir }
    }

    /// Decode a base64 payload and stage it for analysis
    ///
    /// Accepts bare base64 or a `data:` URL as produced by browser uploads.
    pub fn stage(&self, payload_base64: &str, kind: ContentKind) -> Result<StagedMedia, StagingError> {
        // Browser uploads arrive as data URLs, keep only the payload
        let encoded = match payload_base64.split_once("base64,") {
            Some((_, rest)) => rest,
            None => payload_base64,
        };

        let bytes = general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| StagingError::Decode(e.to_string()))?;

        if bytes.is_empty() {
            return Err(StagingError::Decode("payload decoded to zero bytes".to_string()));
        }

        self.stage_bytes(&bytes, kind)
    }

    /// Stage already-binary media (multipart upload path)
    pub fn stage_bytes(&self, bytes: &[u8], kind: ContentKind) -> Result<StagedMedia, StagingError> {
        std::fs::create_dir_all(&self.staging_dir)?;

        let filename = format!("{}-{}.bin", kind.as_str(), Uuid::new_v4());
        let path = self.staging_dir.join(filename);
        std::fs::write(&path, bytes)?;

        tracing::debug!(
            path = %path.display(),
            bytes = bytes.len(),
            kind = %kind,
            "Staged media for analysis"
        );

        Ok(StagedMedia { path })
    }
}

/// Scoped handle to a staged media file
///
/// The file is removed on drop; never left behind once the owning scan
/// exits its extraction step.
pub struct StagedMedia {
    path: PathBuf,
}

impl StagedMedia {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedMedia {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.path.display(),
                    "Failed to remove staged media: {}",
                    e
                );
            }
        }
    }
}
