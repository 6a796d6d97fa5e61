//! Pure PageSpeed Insights REST API client.
//!
//! A minimal client for `runPagespeed` restricted to the accessibility
//! category. Returns the raw Lighthouse report; interpreting it is left to
//! callers.
//!
//! # Example
//!
//! ```rust,ignore
//! use pagespeed_client::PageSpeedClient;
//!
//! let client = PageSpeedClient::new(Some("api-key".into()), Duration::from_secs(45))?;
//! let report = client.run_audit("https://example.com").await?;
//! println!("score: {}", report.accessibility_score());
//! ```

pub mod error;
pub mod types;

pub use error::{PageSpeedError, Result};
pub use types::{
    AuditDetails, AuditItem, AuditNode, LighthouseAudit, LighthouseResult, PageSpeedResponse,
    Strategy,
};

use std::time::Duration;

use reqwest::{Client, Url};
use tracing::{debug, warn};

pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

/// PageSpeed Insights client.
#[derive(Clone)]
pub struct PageSpeedClient {
    http_client: Client,
    api_key: Option<String>,
    endpoint: String,
    strategy: Strategy,
}

impl PageSpeedClient {
    /// Create a client whose requests give up after `timeout`. Without a key
    /// the API applies anonymous quotas.
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PageSpeedError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            strategy: Strategy::Desktop,
        })
    }

    /// Point the client at a different endpoint (proxies, test servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the request URL for auditing `url`.
    pub fn audit_url(&self, url: &str) -> Result<Url> {
        let mut api_url = Url::parse(&self.endpoint)
            .map_err(|e| PageSpeedError::Config(format!("Invalid endpoint: {}", e)))?;

        {
            let mut query = api_url.query_pairs_mut();
            query
                .append_pair("url", url)
                .append_pair("category", "accessibility")
                .append_pair("strategy", self.strategy.as_str());
            if let Some(key) = &self.api_key {
                query.append_pair("key", key);
            }
        }

        Ok(api_url)
    }

    /// Run an accessibility audit for `url` and return the Lighthouse report.
    pub async fn run_audit(&self, url: &str) -> Result<LighthouseResult> {
        let api_url = self.audit_url(url)?;
        debug!(url, strategy = self.strategy.as_str(), "Requesting PageSpeed audit");

        let response = self
            .http_client
            .get(api_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(url, status = status.as_u16(), error = %message, "PageSpeed API error");
            return Err(PageSpeedError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: PageSpeedResponse = response.json().await?;

        if let Some(error) = body.error {
            return Err(PageSpeedError::Rejected(error.message));
        }

        body.lighthouse_result.ok_or(PageSpeedError::NoResult)
    }
}
