//! Postgres scan store tests. Need Docker for the Postgres container.
//!
//! Tests share one database, so every test keys its rows by fresh ids.

mod common;

use chrono::{Duration, Utc};
use test_context::test_context;
use uuid::Uuid;

use crate::common::TestHarness;
use server_core::domains::auditing::models::Summary;
use server_core::domains::scans::{NewScanRecord, StoreError};
use server_core::kernel::BaseScanStore;

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::now_v7())
}

fn completed(session_id: &str, website_url: &str, client_ip: &str, score: u8) -> NewScanRecord {
    NewScanRecord {
        http_status: 200,
        summary: Summary {
            accessibility_score: Some(score),
            ..Summary::empty()
        },
        pages_scanned: 1,
        ..NewScanRecord::failed(session_id, website_url, client_ip, 4_200, "2.0-psi")
    }
}

async fn backdate(ctx: &TestHarness, session_id: &str, by: Duration) {
    sqlx::query("UPDATE scan_results SET created_at = created_at - $1 WHERE session_id = $2")
        .bind(by)
        .bind(session_id)
        .execute(&ctx.db_pool)
        .await
        .unwrap();
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn test_count_by_client_since_counts_recent_attempts(ctx: &TestHarness) {
    let ip = unique("ip");
    let url = unique("https://site");

    ctx.store
        .insert(&completed(&unique("s"), &url, &ip, 90))
        .await
        .unwrap();
    ctx.store
        .insert(&NewScanRecord::failed(&unique("s"), &url, &ip, 10, "2.0-psi"))
        .await
        .unwrap();
    let old = unique("s");
    ctx.store
        .insert(&completed(&old, &url, &ip, 90))
        .await
        .unwrap();
    backdate(ctx, &old, Duration::hours(2)).await;

    let since = Utc::now() - Duration::hours(1);
    let count = ctx.store.count_by_client_since(&ip, since).await.unwrap();

    assert_eq!(count, 2);
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn test_latest_by_url_skips_failed_attempts(ctx: &TestHarness) {
    let url = unique("https://site");
    let older = unique("s");

    ctx.store
        .insert(&completed(&older, &url, "10.0.0.1", 70))
        .await
        .unwrap();
    backdate(ctx, &older, Duration::minutes(10)).await;
    ctx.store
        .insert(&completed(&unique("s"), &url, "10.0.0.1", 85))
        .await
        .unwrap();
    ctx.store
        .insert(&NewScanRecord::failed(&unique("s"), &url, "10.0.0.1", 10, "2.0-psi"))
        .await
        .unwrap();

    let since = Utc::now() - Duration::hours(1);
    let latest = ctx
        .store
        .latest_by_url_since(&url, since)
        .await
        .unwrap()
        .unwrap();

    assert!(latest.is_completed());
    assert_eq!(latest.summary.accessibility_score, Some(85));
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn test_latest_by_url_respects_window(ctx: &TestHarness) {
    let url = unique("https://site");
    let session = unique("s");

    ctx.store
        .insert(&completed(&session, &url, "10.0.0.1", 70))
        .await
        .unwrap();
    backdate(ctx, &session, Duration::minutes(61)).await;

    let since = Utc::now() - Duration::hours(1);
    let latest = ctx.store.latest_by_url_since(&url, since).await.unwrap();

    assert!(latest.is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn test_duplicate_session_is_reported(ctx: &TestHarness) {
    let session = unique("s");
    let url = unique("https://site");

    ctx.store
        .insert(&completed(&session, &url, "10.0.0.1", 70))
        .await
        .unwrap();
    let err = ctx
        .store
        .insert(&completed(&session, &url, "10.0.0.2", 70))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Duplicate(ref s) if *s == session));
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn test_json_columns_round_trip(ctx: &TestHarness) {
    let session = unique("s");
    let url = unique("https://site");

    ctx.store
        .insert(&completed(&session, &url, "10.0.0.1", 64))
        .await
        .unwrap();

    let latest = ctx
        .store
        .latest_by_url_since(&url, Utc::now() - Duration::hours(1))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(latest.session_id, session);
    assert_eq!(latest.summary.accessibility_score, Some(64));
    assert_eq!(latest.scan_duration_ms, 4_200);
    assert!(latest.findings.is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
#[ignore = "requires Docker"]
async fn test_ping(ctx: &TestHarness) {
    ctx.store.ping().await.unwrap();
}
