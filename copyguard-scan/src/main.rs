//! copyguard-scan - Content Match Service
//!
//! Runs the scan-execution and match-decision pipeline for creator
//! content protection: fingerprints reference media and suspect pages via
//! external analysis capabilities, classifies the comparison against the
//! configured threshold, and records every attempt.

use anyhow::Result;
use copyguard_scan::services::{AnalysisClient, ScanOrchestrator, TranscriptClient};
use copyguard_scan::AppState;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting copyguard-scan (Content Match) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Resolve root folder and open the database
    let root_folder = copyguard_common::config::resolve_root_folder("COPYGUARD_ROOT");
    std::fs::create_dir_all(&root_folder)?;

    let db_path = copyguard_common::config::database_path(&root_folder);
    info!("Database: {}", db_path.display());

    let db_pool = copyguard_common::db::init_database(&db_path).await?;
    info!("Database connection established");

    // Capability clients, base URLs overridable via ENV/TOML
    let toml_config = copyguard_common::config::load_toml_config().unwrap_or_default();

    let mut transcript_client = TranscriptClient::new()?;
    if let Some(url) = copyguard_scan::config::resolve_transcript_base_url(&toml_config) {
        info!(transcript_base_url = %url, "Transcript capability configured");
        transcript_client = transcript_client.with_base_url(url);
    }

    let mut analysis_client = AnalysisClient::new()?;
    if let Some(url) = copyguard_scan::config::resolve_analysis_base_url(&toml_config) {
        info!(analysis_base_url = %url, "Analysis capability configured");
        analysis_client = analysis_client.with_base_url(url);
    }

    let staging_dir = copyguard_common::config::staging_dir(&root_folder);
    let orchestrator = ScanOrchestrator::new(
        db_pool.clone(),
        staging_dir,
        transcript_client,
        analysis_client,
    );

    let state = AppState::new(db_pool, orchestrator);
    let app = copyguard_scan::build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:5741").await?;
    info!("Listening on http://127.0.0.1:5741");
    info!("Health check: http://127.0.0.1:5741/health");

    axum::serve(listener, app).await?;

    Ok(())
}
