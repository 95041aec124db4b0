//! Database initialization
//!
//! Opens (or creates) the SQLite database under the resolved root folder
//! and creates the scan-engine tables if they do not exist. Table creation
//! is idempotent so services and tests can call it freely.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers while one scan appends its record
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_settings_table(&pool).await?;
    create_scan_records_table(&pool).await?;

    Ok(pool)
}

/// Create the key-value settings table
pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the scan_records table and its history index
///
/// One row per scan attempt; rows are insert-only and never updated.
pub async fn create_scan_records_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS scan_records (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            page_url TEXT NOT NULL,
            scan_type TEXT NOT NULL,
            status TEXT NOT NULL,
            match_found INTEGER NOT NULL DEFAULT 0,
            match_score REAL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_scan_records_user_created
         ON scan_records (user_id, created_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
