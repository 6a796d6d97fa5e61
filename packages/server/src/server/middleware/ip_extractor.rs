use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};

/// Client address used for rate limiting. Proxies put it in forwarding
/// headers, so it is kept as the header's text rather than a parsed address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientIp(pub String);

pub const UNKNOWN_CLIENT_IP: &str = "unknown";

/// Middleware to extract client IP address from request
///
/// Priority:
/// 1. X-Forwarded-For header (first entry of the comma-separated list)
/// 2. X-Real-IP header
/// 3. The literal "unknown"
pub async fn extract_client_ip(mut request: Request, next: Next) -> Response {
    let ip = client_ip_from_headers(request.headers());
    request.extensions_mut().insert(ClientIp(ip));

    next.run(request).await
}

pub fn client_ip_from_headers(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .unwrap_or(UNKNOWN_CLIENT_IP)
        .to_string()
}
