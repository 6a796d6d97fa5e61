//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::middleware::{cors_middleware, extract_client_ip, CorsConfig};
use crate::server::routes::{
    health_handler, method_not_allowed, notify_waitlist_handler, scan_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: ServerDeps,
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps, allowed_origins: Vec<String>) -> Router {
    let app_state = AppState { deps };
    let cors = Arc::new(CorsConfig::new(allowed_origins));

    Router::new()
        .route(
            "/scan-website",
            post(scan_handler).fallback(method_not_allowed),
        )
        .route("/notify-waitlist", post(notify_waitlist_handler))
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(extract_client_ip))
        .layer(Extension(app_state))
        .layer(middleware::from_fn_with_state(cors, cors_middleware))
        .layer(TraceLayer::new_for_http())
}
