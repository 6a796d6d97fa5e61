use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{NewScanRecord, ScanRecord, StoreError};
use crate::kernel::BaseScanStore;

/// `BaseScanStore` over the `scan_results` table.
#[derive(Clone)]
pub struct PostgresScanStore {
    pool: PgPool,
}

impl PostgresScanStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BaseScanStore for PostgresScanStore {
    async fn insert(&self, record: &NewScanRecord) -> Result<(), StoreError> {
        ScanRecord::insert(record, &self.pool).await.map(|_| ())
    }

    async fn count_by_client_since(
        &self,
        client_ip: &str,
        since: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        ScanRecord::count_by_client_since(client_ip, since, &self.pool).await
    }

    async fn latest_by_url_since(
        &self,
        website_url: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<ScanRecord>, StoreError> {
        ScanRecord::latest_by_url_since(website_url, since, &self.pool).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
