//! Scan history retrieval and filtering tests

use chrono::{Duration, Utc};
use copyguard_scan::db::scans::{insert_scan, list_scans_for_user};
use copyguard_scan::models::{
    ContentKind, MatchOutcome, OutcomeFilter, ScanHistoryFilter, ScanRecord,
};
use sqlx::SqlitePool;
use uuid::Uuid;

async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePool::connect(":memory:").await.unwrap();
    copyguard_common::db::init::create_scan_records_table(&pool)
        .await
        .unwrap();
    pool
}

/// Completed record with an explicit age so ordering is deterministic
fn record(user_id: Uuid, kind: ContentKind, found: bool, minutes_ago: i64) -> ScanRecord {
    let outcome = MatchOutcome {
        match_found: found,
        match_score: if found { 1.0 } else { 0.0 },
        result_message: String::new(),
        threshold_used: 85,
    };
    let mut record = ScanRecord::completed(
        user_id,
        format!("https://pirate.example.com/{}", kind),
        kind,
        &outcome,
    );
    record.created_at = Utc::now() - Duration::minutes(minutes_ago);
    record
}

#[tokio::test]
async fn test_history_is_newest_first() {
    let pool = setup_test_db().await;
    let user_id = Uuid::new_v4();

    let oldest = record(user_id, ContentKind::Text, false, 30);
    let middle = record(user_id, ContentKind::Audio, true, 20);
    let newest = record(user_id, ContentKind::Video, false, 10);

    // Insert out of order
    insert_scan(&pool, &middle).await.unwrap();
    insert_scan(&pool, &oldest).await.unwrap();
    insert_scan(&pool, &newest).await.unwrap();

    let listed = list_scans_for_user(&pool, user_id, ScanHistoryFilter::default(), None)
        .await
        .unwrap();

    let ids: Vec<_> = listed.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![newest.id, middle.id, oldest.id]);
}

#[tokio::test]
async fn test_filter_by_scan_type() {
    let pool = setup_test_db().await;
    let user_id = Uuid::new_v4();

    insert_scan(&pool, &record(user_id, ContentKind::Audio, true, 3))
        .await
        .unwrap();
    insert_scan(&pool, &record(user_id, ContentKind::Text, true, 2))
        .await
        .unwrap();
    insert_scan(&pool, &record(user_id, ContentKind::Audio, false, 1))
        .await
        .unwrap();

    let filter = ScanHistoryFilter {
        scan_type: Some(ContentKind::Audio),
        outcome: None,
    };
    let listed = list_scans_for_user(&pool, user_id, filter, None).await.unwrap();

    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|r| r.scan_type == ContentKind::Audio));
}

#[tokio::test]
async fn test_filter_by_outcome() {
    let pool = setup_test_db().await;
    let user_id = Uuid::new_v4();

    insert_scan(&pool, &record(user_id, ContentKind::Video, true, 2))
        .await
        .unwrap();
    insert_scan(&pool, &record(user_id, ContentKind::Video, false, 1))
        .await
        .unwrap();

    let found = list_scans_for_user(
        &pool,
        user_id,
        ScanHistoryFilter {
            scan_type: None,
            outcome: Some(OutcomeFilter::Found),
        },
        None,
    )
    .await
    .unwrap();
    assert_eq!(found.len(), 1);
    assert!(found[0].match_found);

    let not_found = list_scans_for_user(
        &pool,
        user_id,
        ScanHistoryFilter {
            scan_type: None,
            outcome: Some(OutcomeFilter::NotFound),
        },
        None,
    )
    .await
    .unwrap();
    assert_eq!(not_found.len(), 1);
    assert!(!not_found[0].match_found);
}

#[tokio::test]
async fn test_combined_type_and_outcome_filter() {
    // Only audio records with a confirmed match, newest first
    let pool = setup_test_db().await;
    let user_id = Uuid::new_v4();

    let audio_hit_old = record(user_id, ContentKind::Audio, true, 40);
    let audio_miss = record(user_id, ContentKind::Audio, false, 30);
    let text_hit = record(user_id, ContentKind::Text, true, 20);
    let audio_hit_new = record(user_id, ContentKind::Audio, true, 10);

    for r in [&audio_hit_old, &audio_miss, &text_hit, &audio_hit_new] {
        insert_scan(&pool, r).await.unwrap();
    }

    let filter = ScanHistoryFilter {
        scan_type: Some(ContentKind::Audio),
        outcome: Some(OutcomeFilter::Found),
    };
    let listed = list_scans_for_user(&pool, user_id, filter, None).await.unwrap();

    let ids: Vec<_> = listed.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![audio_hit_new.id, audio_hit_old.id]);
}

#[tokio::test]
async fn test_display_cap_via_limit() {
    let pool = setup_test_db().await;
    let user_id = Uuid::new_v4();

    for age in 1..=15 {
        insert_scan(&pool, &record(user_id, ContentKind::Text, false, age))
            .await
            .unwrap();
    }

    // Callers cap display at the last N
    let listed = list_scans_for_user(&pool, user_id, ScanHistoryFilter::default(), Some(10))
        .await
        .unwrap();
    assert_eq!(listed.len(), 10);

    // The cap keeps the newest records
    let all = list_scans_for_user(&pool, user_id, ScanHistoryFilter::default(), None)
        .await
        .unwrap();
    assert_eq!(listed[0].id, all[0].id);
    assert_eq!(listed[9].id, all[9].id);
}
