//! Data models for the scan engine

pub mod scan;

pub use scan::{
    ContentKind, MatchOutcome, OutcomeFilter, ScanData, ScanHistoryFilter, ScanRecord,
    ScanRequest, ScanResponse, ScanStatus,
};
