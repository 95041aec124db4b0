//! Settings database operations
//!
//! Get/set accessors for the settings table following the key-value
//! pattern. The match threshold read is deliberately infallible: a scan
//! must never block on missing or unreadable configuration.

use copyguard_common::{Error, Result};
use sqlx::{Pool, Sqlite};

#[cfg(test)]
use sqlx::SqlitePool;

/// Default match-acceptance threshold (percent)
pub const DEFAULT_MATCH_THRESHOLD: u8 = 85;

const MATCH_THRESHOLD_KEY: &str = "match_threshold";

/// Get the current match threshold percentage
///
/// **Default:** 85 when the setting is absent, unparseable, out of range,
/// or the read itself fails. Changes take effect on the next scan.
pub async fn get_match_threshold(db: &Pool<Sqlite>) -> u8 {
    match get_setting::<u8>(db, MATCH_THRESHOLD_KEY).await {
        Ok(Some(value)) if value <= 100 => value,
        Ok(Some(value)) => {
            tracing::warn!(value, "Stored match threshold out of range, using default");
            DEFAULT_MATCH_THRESHOLD
        }
        Ok(None) => DEFAULT_MATCH_THRESHOLD,
        Err(e) => {
            tracing::warn!("Match threshold read failed, using default: {}", e);
            DEFAULT_MATCH_THRESHOLD
        }
    }
}

/// Set the match threshold percentage
///
/// Callers validate the 0..=100 range; stored as text like every setting.
pub async fn set_match_threshold(db: &Pool<Sqlite>, threshold: u8) -> Result<()> {
    set_setting(db, MATCH_THRESHOLD_KEY, threshold).await
}

/// Generic setting getter (internal)
async fn get_setting<T>(db: &Pool<Sqlite>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await
        .map_err(Error::Database)?;

    match row {
        Some((value,)) => {
            let parsed = value
                .parse::<T>()
                .map_err(|e| Error::Config(format!("Parse setting failed: {}", e)))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

/// Generic setting setter (internal)
async fn set_setting<T>(db: &Pool<Sqlite>, key: &str, value: T) -> Result<()>
where
    T: std::fmt::Display,
{
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value.to_string())
    .execute(db)
    .await
    .map_err(Error::Database)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Setup in-memory test database with settings table
    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        copyguard_common::db::init::create_settings_table(&pool)
            .await
            .unwrap();
        pool
    }

    #[tokio::test]
    async fn test_threshold_defaults_to_85() {
        let pool = setup_test_db().await;
        assert_eq!(get_match_threshold(&pool).await, 85);
    }

    #[tokio::test]
    async fn test_threshold_set_and_get() {
        let pool = setup_test_db().await;

        set_match_threshold(&pool, 70).await.unwrap();
        assert_eq!(get_match_threshold(&pool).await, 70);

        // UPSERT, not a second row
        set_match_threshold(&pool, 95).await.unwrap();
        assert_eq!(get_match_threshold(&pool).await, 95);

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM settings WHERE key = 'match_threshold'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_garbled_threshold_falls_back_to_default() {
        let pool = setup_test_db().await;

        sqlx::query("INSERT INTO settings (key, value) VALUES ('match_threshold', 'ninety')")
            .execute(&pool)
            .await
            .unwrap();

        assert_eq!(get_match_threshold(&pool).await, 85);
    }

    #[tokio::test]
    async fn test_out_of_range_threshold_falls_back_to_default() {
        let pool = setup_test_db().await;

        sqlx::query("INSERT INTO settings (key, value) VALUES ('match_threshold', '150')")
            .execute(&pool)
            .await
            .unwrap();

        assert_eq!(get_match_threshold(&pool).await, 85);
    }

    #[tokio::test]
    async fn test_read_failure_falls_back_to_default() {
        // Pool without a settings table at all
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        assert_eq!(get_match_threshold(&pool).await, 85);
    }
}
