// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (classifying findings, budgeting a scan) lives in domain
// functions that take these traits.
//
// Naming convention: Base* for trait names (e.g., BaseHtmlFetcher)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagespeed_client::LighthouseResult;

use crate::domains::scans::models::{NewScanRecord, ScanRecord, StoreError};

// =============================================================================
// Accessibility Audit Trait (external Lighthouse-style capability)
// =============================================================================

#[async_trait]
pub trait BaseAccessibilityAuditor: Send + Sync {
    /// Run an accessibility audit of `url` and return the raw report
    async fn run_audit(&self, url: &str) -> Result<LighthouseResult>;
}

// =============================================================================
// HTML Fetch Trait (link discovery)
// =============================================================================

#[async_trait]
pub trait BaseHtmlFetcher: Send + Sync {
    /// Fetch the raw HTML body of `url`, following redirects
    async fn fetch_html(&self, url: &str) -> Result<String>;
}

// =============================================================================
// Scan Store Trait (persistence + rate limit/cache queries)
// =============================================================================

#[async_trait]
pub trait BaseScanStore: Send + Sync {
    /// Append one scan attempt
    async fn insert(&self, record: &NewScanRecord) -> Result<(), StoreError>;

    /// Attempts made by `client_ip` at or after `since`
    async fn count_by_client_since(
        &self,
        client_ip: &str,
        since: DateTime<Utc>,
    ) -> Result<i64, StoreError>;

    /// Most recent completed scan of `website_url` at or after `since`
    async fn latest_by_url_since(
        &self,
        website_url: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<ScanRecord>, StoreError>;

    /// Cheap liveness probe for health checks
    async fn ping(&self) -> Result<(), StoreError>;
}

// =============================================================================
// Notification Traits (fire-and-forget side channel)
// =============================================================================

#[async_trait]
pub trait BaseEmailService: Send + Sync {
    /// Send the waitlist welcome email to `email`
    async fn send_welcome_email(&self, email: &str) -> Result<()>;
}

#[async_trait]
pub trait BaseChatNotifier: Send + Sync {
    /// Post a plain-text message to the team channel
    async fn post_message(&self, text: &str) -> Result<()>;
}
