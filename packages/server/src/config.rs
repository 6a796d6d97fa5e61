use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Front-end origins allowed to call the API. The first entry doubles as the
/// origin echoed back to unrecognized callers.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "https://getcomply.tech",
    "https://certifyada.vercel.app",
    "http://localhost:8080",
    "http://localhost:8081",
];

pub const DEFAULT_WAITLIST_FROM: &str = "Comply <hello@send.getcomply.tech>";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub pagespeed_api_key: Option<String>,
    pub pagespeed_endpoint: Option<String>,
    pub allowed_origins: Vec<String>,
    pub resend_api_key: Option<String>,
    pub waitlist_from_address: String,
    pub slack_webhook_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            pagespeed_api_key: non_empty_var("PAGESPEED_API_KEY"),
            pagespeed_endpoint: non_empty_var("PAGESPEED_ENDPOINT"),
            allowed_origins: non_empty_var("ALLOWED_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .filter(|origins| !origins.is_empty())
                .unwrap_or_else(|| {
                    DEFAULT_ALLOWED_ORIGINS
                        .iter()
                        .map(|s| s.to_string())
                        .collect()
                }),
            resend_api_key: non_empty_var("RESEND_API_KEY"),
            waitlist_from_address: non_empty_var("WAITLIST_FROM_ADDRESS")
                .unwrap_or_else(|| DEFAULT_WAITLIST_FROM.to_string()),
            slack_webhook_url: non_empty_var("SLACK_WEBHOOK_URL"),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Budgets and limits for a single scan.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    /// Crawling and subpage audits are skipped once this much time has passed.
    pub soft_deadline: Duration,
    /// Every audit is cut off at this mark and no further subpage audit starts.
    pub hard_deadline: Duration,
    pub html_fetch_timeout: Duration,
    /// Per-request timeout for the welcome email and chat ping.
    pub notification_timeout: Duration,
    pub max_subpages: usize,
    pub max_candidates: usize,
    pub rate_limit_max_scans: i64,
    pub rate_limit_window: chrono::Duration,
    pub retry_after_secs: u64,
    pub cache_ttl: chrono::Duration,
    pub scanner_version: String,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            soft_deadline: Duration::from_millis(20_000),
            hard_deadline: Duration::from_millis(45_000),
            html_fetch_timeout: Duration::from_millis(8_000),
            notification_timeout: Duration::from_millis(10_000),
            max_subpages: 2,
            max_candidates: 3,
            rate_limit_max_scans: 5,
            rate_limit_window: chrono::Duration::minutes(60),
            retry_after_secs: 3600,
            cache_ttl: chrono::Duration::minutes(60),
            scanner_version: "2.0-psi".to_string(),
        }
    }
}
