use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};

use crate::kernel::BaseChatNotifier;

/// Slack incoming-webhook client
pub struct SlackWebhook {
    client: Client,
    webhook_url: String,
}

#[derive(Debug, Serialize)]
struct SlackMessage<'a> {
    text: &'a str,
}

impl SlackWebhook {
    pub fn new(webhook_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            webhook_url,
        })
    }
}

#[async_trait]
impl BaseChatNotifier for SlackWebhook {
    async fn post_message(&self, text: &str) -> Result<()> {
        info!("Posting Slack message");

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&SlackMessage { text })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            error!("Slack webhook failed {}: {}", status, body);
            anyhow::bail!("Slack webhook error {}: {}", status, body);
        }

        Ok(())
    }
}
