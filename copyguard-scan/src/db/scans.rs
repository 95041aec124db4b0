//! Scan record database operations
//!
//! One row per scan attempt, written unconditionally as the final
//! orchestrator step. Rows are insert-only; history reads are newest-first
//! with optional kind/outcome filters.

use crate::models::{ContentKind, OutcomeFilter, ScanHistoryFilter, ScanRecord, ScanStatus};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Insert a scan record
pub async fn insert_scan(pool: &SqlitePool, record: &ScanRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO scan_records
            (id, user_id, page_url, scan_type, status, match_found, match_score, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.id.to_string())
    .bind(record.user_id.to_string())
    .bind(&record.page_url)
    .bind(record.scan_type.as_str())
    .bind(record.status.as_str())
    .bind(record.match_found)
    .bind(record.match_score)
    .bind(record.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// List scan records for a user, newest first
///
/// `limit = None` returns the full history (callers cap display).
pub async fn list_scans_for_user(
    pool: &SqlitePool,
    user_id: Uuid,
    filter: ScanHistoryFilter,
    limit: Option<i64>,
) -> Result<Vec<ScanRecord>> {
    let mut sql = String::from(
        "SELECT id, user_id, page_url, scan_type, status, match_found, match_score, created_at
         FROM scan_records
         WHERE user_id = ?",
    );

    if filter.scan_type.is_some() {
        sql.push_str(" AND scan_type = ?");
    }
    if let Some(outcome) = filter.outcome {
        match outcome {
            OutcomeFilter::Found => sql.push_str(" AND match_found = 1"),
            OutcomeFilter::NotFound => sql.push_str(" AND match_found = 0"),
        }
    }
    sql.push_str(" ORDER BY created_at DESC");
    if limit.is_some() {
        sql.push_str(" LIMIT ?");
    }

    let mut query = sqlx::query(&sql).bind(user_id.to_string());
    if let Some(kind) = filter.scan_type {
        query = query.bind(kind.as_str());
    }
    if let Some(limit) = limit {
        query = query.bind(limit);
    }

    let rows = query.fetch_all(pool).await?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        records.push(record_from_row(&row)?);
    }

    Ok(records)
}

/// Count records for a user (diagnostics and tests)
pub async fn count_scans_for_user(pool: &SqlitePool, user_id: Uuid) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scan_records WHERE user_id = ?")
        .bind(user_id.to_string())
        .fetch_one(pool)
        .await?;
    Ok(count)
}

fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ScanRecord> {
    let id_str: String = row.get("id");
    let user_id_str: String = row.get("user_id");
    let scan_type_str: String = row.get("scan_type");
    let status_str: String = row.get("status");
    let created_at_str: String = row.get("created_at");

    let scan_type = scan_type_str
        .parse::<ContentKind>()
        .map_err(|e| anyhow::anyhow!(e))?;
    let status = status_str
        .parse::<ScanStatus>()
        .map_err(|e| anyhow::anyhow!(e))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)?.with_timezone(&Utc);

    Ok(ScanRecord {
        id: Uuid::parse_str(&id_str)?,
        user_id: Uuid::parse_str(&user_id_str)?,
        page_url: row.get("page_url"),
        scan_type,
        status,
        match_found: row.get("match_found"),
        match_score: row.get("match_score"),
        created_at,
    })
}
