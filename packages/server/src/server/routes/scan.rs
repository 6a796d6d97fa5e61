use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::domains::scans::{run_scan, ScanError, ScanRequest, ScanRequestBody, ScanResponse};
use crate::domains::scans::types::ScanFailure;
use crate::server::app::AppState;
use crate::server::middleware::ClientIp;

/// `POST /scan-website`
pub async fn scan_handler(
    Extension(state): Extension<AppState>,
    Extension(ClientIp(client_ip)): Extension<ClientIp>,
    payload: Result<Json<ScanRequestBody>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected scan request body");
            return ScanError::InvalidInput("Invalid request body".to_string()).into_response();
        }
    };

    let request = ScanRequest::from_body(body, client_ip);

    match run_scan(request, &state.deps).await {
        Ok(report) => Json(ScanResponse::Report(report)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Any method other than POST (and the OPTIONS preflight) on the scan route.
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ScanResponse::Failure(ScanFailure::new("Method not allowed", None))),
    )
        .into_response()
}
