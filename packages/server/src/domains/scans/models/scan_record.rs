//! Scan Record - append-only log of scan attempts
//!
//! One row per completed or failed attempt. The same table backs the per-client
//! rate limit (count by `client_ip`) and the per-URL result cache (latest
//! successful row by `website_url`).

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::domains::auditing::models::{Finding, PageResult, Summary};

/// HTTP status recorded for an attempt whose homepage audit failed.
pub const FAILED_SCAN_STATUS: i32 = 0;
pub const COMPLETED_SCAN_STATUS: i32 = 200;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Duplicate scan record for session {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store error: {0}")]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::Duplicate(_))
    }
}

/// A persisted scan attempt.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScanRecord {
    pub id: Uuid,
    pub session_id: String,
    pub website_url: String,
    pub client_ip: String,
    pub http_status: i32,
    pub scan_duration_ms: i64,
    #[sqlx(json)]
    pub findings: Vec<Finding>,
    #[sqlx(json)]
    pub summary: Summary,
    #[sqlx(json)]
    pub page_results: Vec<PageResult>,
    pub pages_scanned: i32,
    pub scanner_version: String,
    pub created_at: DateTime<Utc>,
}

/// A scan attempt about to be persisted.
#[derive(Debug, Clone)]
pub struct NewScanRecord {
    pub session_id: String,
    pub website_url: String,
    pub client_ip: String,
    pub http_status: i32,
    pub scan_duration_ms: i64,
    pub findings: Vec<Finding>,
    pub summary: Summary,
    pub page_results: Vec<PageResult>,
    pub pages_scanned: i32,
    pub scanner_version: String,
}

impl NewScanRecord {
    /// Zero-finding record for an attempt whose homepage audit failed.
    pub fn failed(
        session_id: &str,
        website_url: &str,
        client_ip: &str,
        scan_duration_ms: i64,
        scanner_version: &str,
    ) -> Self {
        Self {
            session_id: session_id.to_string(),
            website_url: website_url.to_string(),
            client_ip: client_ip.to_string(),
            http_status: FAILED_SCAN_STATUS,
            scan_duration_ms,
            findings: Vec::new(),
            summary: Summary::empty(),
            page_results: Vec::new(),
            pages_scanned: 0,
            scanner_version: scanner_version.to_string(),
        }
    }

    pub fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> ScanRecord {
        ScanRecord {
            id,
            session_id: self.session_id,
            website_url: self.website_url,
            client_ip: self.client_ip,
            http_status: self.http_status,
            scan_duration_ms: self.scan_duration_ms,
            findings: self.findings,
            summary: self.summary,
            page_results: self.page_results,
            pages_scanned: self.pages_scanned,
            scanner_version: self.scanner_version,
            created_at,
        }
    }
}

impl ScanRecord {
    pub fn is_completed(&self) -> bool {
        self.http_status == COMPLETED_SCAN_STATUS
    }

    /// Append a scan attempt. A second insert for the same session id is
    /// reported as `StoreError::Duplicate`.
    pub async fn insert(record: &NewScanRecord, pool: &PgPool) -> Result<Uuid, StoreError> {
        let id = Uuid::now_v7();

        let result = sqlx::query(
            r#"
            INSERT INTO scan_results (
                id, session_id, website_url, client_ip, http_status, scan_duration_ms,
                findings, summary, page_results, pages_scanned, scanner_version
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(id)
        .bind(&record.session_id)
        .bind(&record.website_url)
        .bind(&record.client_ip)
        .bind(record.http_status)
        .bind(record.scan_duration_ms)
        .bind(Json(&record.findings))
        .bind(Json(&record.summary))
        .bind(Json(&record.page_results))
        .bind(record.pages_scanned)
        .bind(&record.scanner_version)
        .execute(pool)
        .await;

        match result {
            Ok(_) => Ok(id),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::Duplicate(record.session_id.clone()))
            }
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    /// Number of attempts from `client_ip` since `since`, failed ones included.
    pub async fn count_by_client_since(
        client_ip: &str,
        since: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM scan_results WHERE client_ip = $1 AND created_at >= $2",
        )
        .bind(client_ip)
        .bind(since)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Most recent completed scan of `website_url` since `since`. A failed
    /// attempt is never returned, even when it is newer than the last
    /// completed scan.
    pub async fn latest_by_url_since(
        website_url: &str,
        since: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Option<Self>, StoreError> {
        let record = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM scan_results
            WHERE website_url = $1
              AND created_at >= $2
              AND http_status = $3
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(website_url)
        .bind(since)
        .bind(COMPLETED_SCAN_STATUS)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }
}
