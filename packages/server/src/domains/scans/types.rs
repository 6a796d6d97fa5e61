//! Request and response shapes for the scan endpoint.

use serde::{Deserialize, Serialize};

use crate::domains::auditing::models::{PageResult, Summary};

/// JSON body of `POST /scan-website`. Fields are optional so that a missing
/// field yields a specific validation message rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequestBody {
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// One scan attempt as seen by the orchestrator. `client_ip` always comes
/// from transport metadata.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub website_url: String,
    pub session_id: String,
    pub client_ip: String,
}

impl ScanRequest {
    pub fn from_body(body: ScanRequestBody, client_ip: impl Into<String>) -> Self {
        Self {
            website_url: body.website_url.unwrap_or_default(),
            session_id: body.session_id.unwrap_or_default(),
            client_ip: client_ip.into(),
        }
    }
}

/// Free-tier preview of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teaser {
    pub top_issue: String,
    /// Distinct rule ids, not raw findings
    pub issue_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility_score: Option<u8>,
}

/// Successful scan, fresh or cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub success: bool,
    pub session_id: String,
    pub summary: Summary,
    pub teaser: Teaser,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages_scanned: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_results: Option<Vec<PageResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
}

impl ScanReport {
    pub fn is_cached(&self) -> bool {
        self.cached.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanFailure {
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl ScanFailure {
    pub fn new(error: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self {
            success: false,
            error: error.into(),
            retry_after,
        }
    }
}

/// Wire contract of the scan endpoint: a report or a failure, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScanResponse {
    Report(ScanReport),
    Failure(ScanFailure),
}
