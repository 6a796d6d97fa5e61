use std::time::Duration;

use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::server::app::AppState;

const DB_PING_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<DatabaseHealth>,
}

#[derive(Serialize)]
pub struct DatabaseHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint
///
/// Pings the scan store. Returns 200 OK when it answers within 5 seconds,
/// 503 Service Unavailable otherwise.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let db_error = match tokio::time::timeout(DB_PING_TIMEOUT, state.deps.scan_store.ping()).await
    {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(format!("Query failed: {}", e)),
        Err(_) => Some("Query timeout (>5s)".to_string()),
    };

    match db_error {
        None => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                database: None,
            }),
        ),
        Some(error) => {
            tracing::error!(error = %error, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy".to_string(),
                    database: Some(DatabaseHealth {
                        status: "error".to_string(),
                        error: Some(error),
                    }),
                }),
            )
        }
    }
}
