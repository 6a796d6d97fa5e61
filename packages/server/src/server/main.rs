// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use pagespeed_client::PageSpeedClient;
use server_core::common::{ResendClient, SlackWebhook};
use server_core::domains::auditing::WcagClassifier;
use server_core::domains::scans::PostgresScanStore;
use server_core::kernel::{
    BaseChatNotifier, BaseEmailService, HttpHtmlFetcher, PageSpeedAdapter, ServerDeps,
};
use server_core::{server::build_app, Config, ScanSettings};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting accessibility scan API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    let settings = ScanSettings::default();

    // External audit capability, never outliving the scan's hard deadline
    let mut pagespeed =
        PageSpeedClient::new(config.pagespeed_api_key.clone(), settings.hard_deadline)
            .context("Failed to create PageSpeed client")?;
    if let Some(endpoint) = &config.pagespeed_endpoint {
        pagespeed = pagespeed.with_endpoint(endpoint);
    }
    if config.pagespeed_api_key.is_none() {
        tracing::warn!("PAGESPEED_API_KEY not set, using unauthenticated quota");
    }

    let html_fetcher = HttpHtmlFetcher::new(settings.html_fetch_timeout)?;

    // Notification side channel (optional)
    let email_service: Option<Arc<dyn BaseEmailService>> = match config.resend_api_key.clone() {
        Some(key) => Some(Arc::new(ResendClient::new(
            key,
            config.waitlist_from_address.clone(),
            settings.notification_timeout,
        )?)),
        None => None,
    };
    let chat_notifier: Option<Arc<dyn BaseChatNotifier>> = match config.slack_webhook_url.clone() {
        Some(url) => Some(Arc::new(SlackWebhook::new(
            url,
            settings.notification_timeout,
        )?)),
        None => None,
    };

    let classifier = WcagClassifier::new();
    tracing::info!(rules = classifier.len(), "WCAG classifier loaded");

    let deps = ServerDeps::new(
        Arc::new(PageSpeedAdapter::new(pagespeed)),
        Arc::new(html_fetcher),
        Arc::new(PostgresScanStore::new(pool)),
        email_service,
        chat_notifier,
        Arc::new(classifier),
        settings,
    );

    // Build application
    let app = build_app(deps, config.allowed_origins.clone());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Scan endpoint: http://localhost:{}/scan-website", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
