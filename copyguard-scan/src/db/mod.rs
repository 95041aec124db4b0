//! Database access for the scan engine
//!
//! Connects to the shared copyguard.db in the root folder. Table creation
//! lives in `copyguard_common::db::init`.

pub mod scans;
pub mod settings;
