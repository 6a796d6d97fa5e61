use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use super::models::StoreError;
use super::types::{ScanFailure, ScanResponse};

/// Terminal failures of a scan request, each with a fixed HTTP status.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Missing fields or an unparseable URL
    #[error("{0}")]
    InvalidInput(String),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited { retry_after: u64 },

    /// The homepage audit failed; subpage failures never surface here
    #[error("Could not scan website: {0}")]
    AuditFailed(String),

    /// Store detail stays in the logs; callers only see a generic message
    #[error("Internal server error")]
    PersistenceFailed(#[source] StoreError),
}

impl ScanError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ScanError::InvalidInput(_) | ScanError::AuditFailed(_) => StatusCode::BAD_REQUEST,
            ScanError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ScanError::PersistenceFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn retry_after(&self) -> Option<u64> {
        match self {
            ScanError::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

impl IntoResponse for ScanError {
    fn into_response(self) -> Response {
        let body = ScanResponse::Failure(ScanFailure::new(self.to_string(), self.retry_after()));
        (self.status_code(), Json(body)).into_response()
    }
}
