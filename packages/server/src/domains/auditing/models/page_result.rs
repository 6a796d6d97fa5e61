use serde::{Deserialize, Serialize};

use super::{Finding, Summary};

/// Audit outcome for one successfully scanned page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub page_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    pub accessibility_score: u8,
    pub findings: Vec<Finding>,
    pub summary: Summary,
}

impl PageResult {
    pub fn new(
        page_url: impl Into<String>,
        page_title: Option<String>,
        accessibility_score: u8,
        findings: Vec<Finding>,
    ) -> Self {
        let summary = Summary::from_findings(&findings, Some(accessibility_score));
        Self {
            page_url: page_url.into(),
            page_title,
            accessibility_score,
            findings,
            summary,
        }
    }
}

/// Human title for a subpage derived from its last path segment:
/// `/new-patients/` becomes `New patients`.
pub fn page_title_from_url(page_url: &str) -> String {
    let segment = url::Url::parse(page_url).ok().and_then(|u| {
        u.path_segments()
            .and_then(|segments| segments.rev().find(|s| !s.is_empty()).map(str::to_string))
    });

    let Some(segment) = segment else {
        return "Page".to_string();
    };

    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>().replace('-', " "),
        None => "Page".to_string(),
    }
}
