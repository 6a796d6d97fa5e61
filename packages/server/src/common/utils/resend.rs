use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};

use crate::kernel::BaseEmailService;

const RESEND_API_URL: &str = "https://api.resend.com/emails";
const WELCOME_SUBJECT: &str = "Welcome to the Comply Waitlist";

const WELCOME_HTML: &str = r#"
<div style="font-family: sans-serif; max-width: 600px; margin: 0 auto;">
    <h1 style="color: #1a1a1a;">Welcome to Comply!</h1>
    <p style="color: #4a4a4a; font-size: 16px; line-height: 1.5;">
        Thanks for joining our waitlist. We're building the most advanced ADA compliance scanner for modern web teams.
    </p>
    <p style="color: #4a4a4a; font-size: 16px; line-height: 1.5;">
        We'll reach out as soon as we open up early access spots.
    </p>
    <hr style="border: 0; border-top: 1px solid #eaeaea; margin: 30px 0;">
    <p style="color: #888; font-size: 14px;">
        - The Comply Team
    </p>
</div>
"#;

/// Resend email client
/// Sends the waitlist welcome email
pub struct ResendClient {
    client: Client,
    api_key: String,
    from_address: String,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct ResendEmail<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
}

impl ResendClient {
    pub fn new(api_key: String, from_address: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            from_address,
            endpoint: RESEND_API_URL.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn welcome_email<'a>(&'a self, to: &'a str) -> ResendEmail<'a> {
        ResendEmail {
            from: &self.from_address,
            to: vec![to],
            subject: WELCOME_SUBJECT,
            html: WELCOME_HTML,
        }
    }
}

#[async_trait]
impl BaseEmailService for ResendClient {
    async fn send_welcome_email(&self, email: &str) -> Result<()> {
        info!("Sending welcome email to: {}", email);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.welcome_email(email))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            error!("Resend email failed {}: {}", status, body);
            anyhow::bail!("Resend API error {}: {}", status, body);
        }

        info!("Welcome email sent successfully");
        Ok(())
    }
}
