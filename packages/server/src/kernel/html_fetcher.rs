//! Plain HTTP fetcher used for link discovery.
//!
//! No JavaScript rendering: links injected client-side are not discovered.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::BaseHtmlFetcher;

pub const SCANNER_USER_AGENT: &str =
    "ComplyBot/2.0 (Accessibility Scanner; +https://getcomply.tech)";

/// reqwest-backed `BaseHtmlFetcher`
pub struct HttpHtmlFetcher {
    client: reqwest::Client,
}

impl HttpHtmlFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("text/html,application/xhtml+xml"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(SCANNER_USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl BaseHtmlFetcher for HttpHtmlFetcher {
    async fn fetch_html(&self, url: &str) -> Result<String> {
        debug!(url = %url, "Fetching HTML");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {} for {}", status, url);
        }

        response
            .text()
            .await
            .context("Failed to read response body")
    }
}
