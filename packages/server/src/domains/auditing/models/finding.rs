use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal impact of a finding. Declaration order is rank order, so sorting
/// ascending puts `Critical` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WcagLevel {
    A,
    AA,
    AAA,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WcagPrinciple {
    Perceivable,
    Operable,
    Understandable,
    Robust,
}

/// One accessibility defect found on one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub id: String,
    pub check: String,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wcag_criterion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wcag_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wcag_level: Option<WcagLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wcag_principle: Option<WcagPrinciple>,
    pub page_url: String,
    pub remediation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_rank_order() {
        let mut severities = vec![Severity::Low, Severity::Critical, Severity::Medium, Severity::High];
        severities.sort();
        assert_eq!(
            severities,
            vec![Severity::Critical, Severity::High, Severity::Medium, Severity::Low]
        );
    }

    #[test]
    fn test_finding_wire_shape_omits_absent_fields() {
        let finding = Finding {
            id: "bypass".into(),
            check: "The page contains a heading, skip link, or landmark region".into(),
            severity: Severity::Medium,
            message: "Adding ways to bypass repetitive content lets keyboard users navigate the page more efficiently.".into(),
            details: None,
            count: None,
            wcag_criterion: None,
            wcag_name: None,
            wcag_level: None,
            wcag_principle: None,
            page_url: "https://example.com".into(),
            remediation: "Add a 'Skip to main content' link at the beginning of the page.".into(),
            elements: None,
        };

        let value = serde_json::to_value(&finding).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object["severity"], "medium");
        assert_eq!(object["pageUrl"], "https://example.com");
        assert!(!object.contains_key("wcagCriterion"));
        assert!(!object.contains_key("elements"));
        assert!(!object.contains_key("count"));
    }

    #[test]
    fn test_wcag_level_serializes_verbatim() {
        assert_eq!(serde_json::to_value(WcagLevel::AA).unwrap(), "AA");
        assert_eq!(
            serde_json::to_value(WcagPrinciple::Understandable).unwrap(),
            "Understandable"
        );
    }
}
