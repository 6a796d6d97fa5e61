// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagespeed_client::types::CategoryScore;
use pagespeed_client::{AuditDetails, AuditItem, AuditNode, LighthouseAudit, LighthouseResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use super::{
    BaseAccessibilityAuditor, BaseChatNotifier, BaseEmailService, BaseHtmlFetcher, BaseScanStore,
    ServerDeps,
};
use crate::config::ScanSettings;
use crate::domains::auditing::WcagClassifier;
use crate::domains::scans::models::{NewScanRecord, ScanRecord, StoreError};

// =============================================================================
// Lighthouse report fixtures
// =============================================================================

/// Build a Lighthouse report with the given category score and audits.
pub fn lighthouse_report(score: f64, audits: Vec<LighthouseAudit>) -> LighthouseResult {
    let mut result = LighthouseResult::default();
    result.categories.accessibility = Some(CategoryScore { score: Some(score) });
    for audit in audits {
        result.audits.insert(audit.id.clone(), audit);
    }
    result
}

/// A scored audit with `item_count` affected nodes.
pub fn failing_audit(id: &str, score: f64, item_count: usize) -> LighthouseAudit {
    let items = (0..item_count)
        .map(|i| AuditItem {
            node: Some(AuditNode {
                selector: Some(format!("#{}-{}", id, i)),
                snippet: Some(format!("<div id=\"{}-{}\">", id, i)),
                explanation: None,
            }),
        })
        .collect();

    LighthouseAudit {
        id: id.to_string(),
        title: format!("{} check", id),
        description: format!(
            "The {} rule failed. [Learn more](https://dequeuniversity.com/rules/axe/{}).",
            id, id
        ),
        score: Some(score),
        score_display_mode: "binary".to_string(),
        details: Some(AuditDetails { items }),
    }
}

/// An audit that passed.
pub fn passing_audit(id: &str) -> LighthouseAudit {
    LighthouseAudit {
        id: id.to_string(),
        title: format!("{} check", id),
        description: "Passed.".to_string(),
        score: Some(1.0),
        score_display_mode: "binary".to_string(),
        details: None,
    }
}

// =============================================================================
// Mock Accessibility Auditor
// =============================================================================

#[derive(Clone)]
struct MockAudit {
    outcome: std::result::Result<LighthouseResult, String>,
    delay: Duration,
}

#[derive(Default)]
pub struct MockAuditor {
    audits: Mutex<HashMap<String, MockAudit>>,
    calls: Mutex<Vec<String>>,
}

impl MockAuditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `report` when `url` is audited
    pub fn with_report(self, url: &str, report: LighthouseResult) -> Self {
        self.with_delayed_report(url, report, Duration::ZERO)
    }

    /// Return `report` for `url` after sleeping `delay` (tokio time)
    pub fn with_delayed_report(self, url: &str, report: LighthouseResult, delay: Duration) -> Self {
        self.audits.lock().unwrap().insert(
            url.to_string(),
            MockAudit {
                outcome: Ok(report),
                delay,
            },
        );
        self
    }

    /// Fail the audit of `url` with `message`
    pub fn with_failure(self, url: &str, message: &str) -> Self {
        self.audits.lock().unwrap().insert(
            url.to_string(),
            MockAudit {
                outcome: Err(message.to_string()),
                delay: Duration::ZERO,
            },
        );
        self
    }

    /// URLs audited so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn was_audited(&self, url: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|u| u == url)
    }
}

#[async_trait]
impl BaseAccessibilityAuditor for MockAuditor {
    async fn run_audit(&self, url: &str) -> Result<LighthouseResult> {
        self.calls.lock().unwrap().push(url.to_string());

        let audit = self.audits.lock().unwrap().get(url).cloned();
        let Some(audit) = audit else {
            anyhow::bail!("No mock audit configured for {}", url);
        };

        if !audit.delay.is_zero() {
            tokio::time::sleep(audit.delay).await;
        }

        audit.outcome.map_err(|message| anyhow::anyhow!(message))
    }
}

// =============================================================================
// Mock HTML Fetcher
// =============================================================================

#[derive(Default)]
pub struct MockHtmlFetcher {
    pages: Mutex<HashMap<String, String>>,
    delay: Mutex<Duration>,
    calls: Mutex<Vec<String>>,
}

impl MockHtmlFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: &str, html: &str) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), html.to_string());
        self
    }

    /// Sleep `delay` (tokio time) before every response
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = delay;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseHtmlFetcher for MockHtmlFetcher {
    async fn fetch_html(&self, url: &str) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());

        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.pages
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("HTTP 404 Not Found for {}", url))
    }
}

// =============================================================================
// In-memory Scan Store
// =============================================================================

/// `BaseScanStore` kept in a Vec. Enforces unique session ids like the
/// database does.
#[derive(Default)]
pub struct InMemoryScanStore {
    records: Mutex<Vec<ScanRecord>>,
    fail_reads: Mutex<bool>,
    fail_inserts: Mutex<Option<String>>,
}

impl InMemoryScanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every read query fail (store outage)
    pub fn with_failing_reads(self) -> Self {
        *self.fail_reads.lock().unwrap() = true;
        self
    }

    /// Make every insert fail with `message`
    pub fn with_failing_inserts(self, message: &str) -> Self {
        *self.fail_inserts.lock().unwrap() = Some(message.to_string());
        self
    }

    /// Seed a record created at `created_at`
    pub fn seed(&self, record: NewScanRecord, created_at: DateTime<Utc>) {
        self.records
            .lock()
            .unwrap()
            .push(record.into_record(Uuid::now_v7(), created_at));
    }

    /// Shift every stored record `by` into the past
    pub fn age_all(&self, by: chrono::Duration) {
        for record in self.records.lock().unwrap().iter_mut() {
            record.created_at -= by;
        }
    }

    pub fn records(&self) -> Vec<ScanRecord> {
        self.records.lock().unwrap().clone()
    }

    fn check_reads(&self) -> Result<(), StoreError> {
        if *self.fail_reads.lock().unwrap() {
            return Err(StoreError::Other(anyhow::anyhow!("connection refused")));
        }
        Ok(())
    }
}

#[async_trait]
impl BaseScanStore for InMemoryScanStore {
    async fn insert(&self, record: &NewScanRecord) -> Result<(), StoreError> {
        if let Some(message) = self.fail_inserts.lock().unwrap().clone() {
            return Err(StoreError::Other(anyhow::anyhow!(message)));
        }

        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.session_id == record.session_id) {
            return Err(StoreError::Duplicate(record.session_id.clone()));
        }
        records.push(record.clone().into_record(Uuid::now_v7(), Utc::now()));
        Ok(())
    }

    async fn count_by_client_since(
        &self,
        client_ip: &str,
        since: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        self.check_reads()?;
        let count = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.client_ip == client_ip && r.created_at >= since)
            .count();
        Ok(count as i64)
    }

    async fn latest_by_url_since(
        &self,
        website_url: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<ScanRecord>, StoreError> {
        self.check_reads()?;
        let latest = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.website_url == website_url && r.created_at >= since && r.is_completed())
            .max_by_key(|r| r.created_at)
            .cloned();
        Ok(latest)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_reads()
    }
}

// =============================================================================
// Mock Notifiers
// =============================================================================

#[derive(Default)]
pub struct MockEmailService {
    sent: Mutex<Vec<String>>,
    fail: bool,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseEmailService for MockEmailService {
    async fn send_welcome_email(&self, email: &str) -> Result<()> {
        if self.fail {
            anyhow::bail!("Email API error 500");
        }
        self.sent.lock().unwrap().push(email.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockChatNotifier {
    messages: Mutex<Vec<String>>,
}

impl MockChatNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseChatNotifier for MockChatNotifier {
    async fn post_message(&self, text: &str) -> Result<()> {
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub auditor: Arc<MockAuditor>,
    pub html_fetcher: Arc<MockHtmlFetcher>,
    pub scan_store: Arc<InMemoryScanStore>,
    pub email_service: Arc<MockEmailService>,
    pub chat_notifier: Arc<MockChatNotifier>,
    pub settings: ScanSettings,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            auditor: Arc::new(MockAuditor::new()),
            html_fetcher: Arc::new(MockHtmlFetcher::new()),
            scan_store: Arc::new(InMemoryScanStore::new()),
            email_service: Arc::new(MockEmailService::new()),
            chat_notifier: Arc::new(MockChatNotifier::new()),
            settings: ScanSettings::default(),
        }
    }

    pub fn mock_auditor(mut self, auditor: MockAuditor) -> Self {
        self.auditor = Arc::new(auditor);
        self
    }

    pub fn mock_fetcher(mut self, fetcher: MockHtmlFetcher) -> Self {
        self.html_fetcher = Arc::new(fetcher);
        self
    }

    pub fn mock_store(mut self, store: InMemoryScanStore) -> Self {
        self.scan_store = Arc::new(store);
        self
    }

    pub fn mock_email(mut self, service: MockEmailService) -> Self {
        self.email_service = Arc::new(service);
        self
    }

    pub fn settings(mut self, settings: ScanSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build ServerDeps backed by these mocks
    pub fn into_server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.auditor.clone(),
            self.html_fetcher.clone(),
            self.scan_store.clone(),
            Some(self.email_service.clone()),
            Some(self.chat_notifier.clone()),
            Arc::new(WcagClassifier::new()),
            self.settings.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
