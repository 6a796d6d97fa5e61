//! CORS for the browser front ends.
//!
//! Unlike `tower_http::cors`, an unrecognized origin is answered with the
//! default allowed origin instead of being dropped or reflected, and
//! preflight requests are answered with a plain `ok` body.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN, VARY,
        },
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

pub const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
pub const ALLOWED_METHODS: &str = "POST, OPTIONS";

/// Origin allow-list. The first entry is the default origin.
#[derive(Debug, Clone)]
pub struct CorsConfig {
    allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn new(allowed_origins: Vec<String>) -> Self {
        Self { allowed_origins }
    }

    /// Origin to echo back for a request from `origin`.
    pub fn allow_origin_for(&self, origin: Option<&str>) -> Option<&str> {
        origin
            .and_then(|o| self.allowed_origins.iter().find(|allowed| *allowed == o))
            .or_else(|| self.allowed_origins.first())
            .map(String::as_str)
    }

    fn apply(&self, origin: Option<&str>, headers: &mut HeaderMap) {
        if let Some(value) = self
            .allow_origin_for(origin)
            .and_then(|o| HeaderValue::from_str(o).ok())
        {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(VARY, HeaderValue::from_static("Origin"));
    }
}

pub async fn cors_middleware(
    State(cors): State<Arc<CorsConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut response = if request.method() == Method::OPTIONS {
        (StatusCode::OK, "ok").into_response()
    } else {
        next.run(request).await
    };

    cors.apply(origin.as_deref(), response.headers_mut());
    response
}
