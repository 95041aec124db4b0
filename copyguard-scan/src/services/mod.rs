//! Service modules for the scan pipeline

pub mod analysis_client;
pub mod match_evaluator;
pub mod media_stager;
pub mod scan_orchestrator;
pub mod transcript_client;

pub use analysis_client::{AnalysisClient, AnalysisError};
pub use media_stager::{MediaStager, StagedMedia, StagingError};
pub use scan_orchestrator::{ScanError, ScanOrchestrator};
pub use transcript_client::{TranscriptClient, TranscriptError};
