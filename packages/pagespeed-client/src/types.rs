use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Device profile Lighthouse emulates for the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    #[default]
    Desktop,
    Mobile,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Desktop => "desktop",
            Strategy::Mobile => "mobile",
        }
    }
}

/// Top-level `runPagespeed` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpeedResponse {
    pub lighthouse_result: Option<LighthouseResult>,
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    pub message: String,
}

/// The Lighthouse report embedded in a PageSpeed response.
///
/// Audits keep the order the API returned them in.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LighthouseResult {
    #[serde(default)]
    pub categories: Categories,
    #[serde(default)]
    pub audits: IndexMap<String, LighthouseAudit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
}

impl LighthouseResult {
    /// Accessibility category score in [0, 1]; 0 when the category is missing.
    pub fn accessibility_score(&self) -> f64 {
        self.categories
            .accessibility
            .as_ref()
            .and_then(|c| c.score)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Categories {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<CategoryScore>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CategoryScore {
    pub score: Option<f64>,
}

/// One Lighthouse rule result.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LighthouseAudit {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub score: Option<f64>,
    #[serde(default)]
    pub score_display_mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<AuditDetails>,
}

impl LighthouseAudit {
    pub fn items(&self) -> &[AuditItem] {
        self.details
            .as_ref()
            .map(|d| d.items.as_slice())
            .unwrap_or(&[])
    }

    pub fn item_count(&self) -> usize {
        self.items().len()
    }

    /// True for display modes that never represent a defect.
    pub fn is_not_scored(&self) -> bool {
        matches!(
            self.score_display_mode.as_str(),
            "notApplicable" | "informative"
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuditDetails {
    #[serde(default)]
    pub items: Vec<AuditItem>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuditItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<AuditNode>,
}

impl AuditItem {
    /// Snippet of the offending node, falling back to its selector.
    pub fn sample(&self) -> Option<&str> {
        let node = self.node.as_ref()?;
        node.snippet
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| node.selector.as_deref().filter(|s| !s.is_empty()))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuditNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lighthouse_result_keeps_audit_order() {
        let json = serde_json::json!({
            "lighthouseResult": {
                "categories": { "accessibility": { "score": 0.82 } },
                "finalUrl": "https://example.com/",
                "audits": {
                    "link-name": { "id": "link-name", "title": "Links have names", "score": 0, "scoreDisplayMode": "binary" },
                    "color-contrast": {
                        "id": "color-contrast",
                        "title": "Contrast",
                        "description": "Low contrast is hard to read. Learn more.",
                        "score": 0,
                        "scoreDisplayMode": "binary",
                        "details": { "type": "table", "items": [
                            { "node": { "selector": "p.muted", "snippet": "<p class=\"muted\">" } },
                            { "node": { "selector": "span.tiny" } },
                            { "url": "https://example.com/img.png" }
                        ] }
                    },
                    "bypass": { "id": "bypass", "title": "Bypass", "score": null, "scoreDisplayMode": "notApplicable" }
                }
            }
        });

        let response: PageSpeedResponse = serde_json::from_value(json).unwrap();
        let result = response.lighthouse_result.unwrap();

        assert_eq!(result.accessibility_score(), 0.82);
        assert_eq!(result.final_url.as_deref(), Some("https://example.com/"));
        let ids: Vec<&str> = result.audits.keys().map(|k| k.as_str()).collect();
        assert_eq!(ids, vec!["link-name", "color-contrast", "bypass"]);

        let contrast = &result.audits["color-contrast"];
        assert_eq!(contrast.item_count(), 3);
        let samples: Vec<&str> = contrast.items().iter().filter_map(|i| i.sample()).collect();
        assert_eq!(samples, vec!["<p class=\"muted\">", "span.tiny"]);

        assert!(result.audits["bypass"].is_not_scored());
        assert!(result.audits["bypass"].score.is_none());
    }

    #[test]
    fn test_missing_category_scores_zero() {
        let result: LighthouseResult = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(result.accessibility_score(), 0.0);
        assert!(result.audits.is_empty());
    }

    #[test]
    fn test_parse_error_body() {
        let json = serde_json::json!({
            "error": { "code": 400, "message": "Lighthouse returned error: FAILED_DOCUMENT_REQUEST" }
        });
        let response: PageSpeedResponse = serde_json::from_value(json).unwrap();
        assert!(response.lighthouse_result.is_none());
        assert_eq!(response.error.unwrap().code, Some(400));
    }
}
