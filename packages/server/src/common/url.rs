//! Canonical form for user-supplied website URLs.
//!
//! A normalized URL is trimmed, lower-cased, carries an explicit scheme
//! (`https://` when none was given) and has no trailing slash. It is the key
//! for the scan cache, so two spellings of the same site must collapse to the
//! same string.

use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Invalid URL format")]
    Invalid(String),
}

/// Normalize a raw URL string.
///
/// Fails when the result is not a well-formed absolute URL with a host.
pub fn normalize_url(raw: &str) -> Result<String, UrlError> {
    let mut normalized = raw.trim().to_lowercase();

    if normalized.is_empty() {
        return Err(UrlError::Invalid(raw.to_string()));
    }

    if !normalized.starts_with("http://") && !normalized.starts_with("https://") {
        normalized = format!("https://{}", normalized);
    }

    // Strip every trailing slash so normalize(normalize(x)) == normalize(x)
    // also holds for inputs like "example.com//".
    while normalized.ends_with('/') {
        normalized.pop();
    }

    match Url::parse(&normalized) {
        Ok(parsed) if parsed.host_str().is_some_and(|h| !h.is_empty()) => Ok(normalized),
        _ => Err(UrlError::Invalid(raw.to_string())),
    }
}
