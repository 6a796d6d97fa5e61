//! Server dependencies for scan execution (using traits for testability)
//!
//! This module provides the central dependency container handed to every
//! request. All external services use trait abstractions to enable testing.

use anyhow::Result;
use async_trait::async_trait;
use pagespeed_client::{LighthouseResult, PageSpeedClient};
use std::sync::Arc;

use crate::config::ScanSettings;
use crate::domains::auditing::WcagClassifier;
use crate::kernel::{
    BaseAccessibilityAuditor, BaseChatNotifier, BaseEmailService, BaseHtmlFetcher, BaseScanStore,
};

// =============================================================================
// PageSpeedClient Adapter (implements BaseAccessibilityAuditor trait)
// =============================================================================

/// Wrapper around PageSpeedClient that implements BaseAccessibilityAuditor
pub struct PageSpeedAdapter(pub PageSpeedClient);

impl PageSpeedAdapter {
    pub fn new(client: PageSpeedClient) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseAccessibilityAuditor for PageSpeedAdapter {
    async fn run_audit(&self, url: &str) -> Result<LighthouseResult> {
        Ok(self.0.run_audit(url).await?)
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Dependencies shared by all scan executions
#[derive(Clone)]
pub struct ServerDeps {
    pub auditor: Arc<dyn BaseAccessibilityAuditor>,
    pub html_fetcher: Arc<dyn BaseHtmlFetcher>,
    pub scan_store: Arc<dyn BaseScanStore>,
    /// Welcome email sender; `None` when no credential is configured
    pub email_service: Option<Arc<dyn BaseEmailService>>,
    /// Team chat webhook; `None` when no webhook is configured
    pub chat_notifier: Option<Arc<dyn BaseChatNotifier>>,
    /// Read-only WCAG tables, built once at startup
    pub classifier: Arc<WcagClassifier>,
    pub settings: Arc<ScanSettings>,
}

impl ServerDeps {
    pub fn new(
        auditor: Arc<dyn BaseAccessibilityAuditor>,
        html_fetcher: Arc<dyn BaseHtmlFetcher>,
        scan_store: Arc<dyn BaseScanStore>,
        email_service: Option<Arc<dyn BaseEmailService>>,
        chat_notifier: Option<Arc<dyn BaseChatNotifier>>,
        classifier: Arc<WcagClassifier>,
        settings: ScanSettings,
    ) -> Self {
        Self {
            auditor,
            html_fetcher,
            scan_store,
            email_service,
            chat_notifier,
            classifier,
            settings: Arc::new(settings),
        }
    }
}
